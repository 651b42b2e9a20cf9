//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Settings};
use crate::error::CliError;
use crate::output;

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let written = config::save_config(&Config::default())?;
            tracing::info!(path = %written.display(), "wrote default config");
            output::print_notice(
                &format!("Config written to {}", written.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let settings = Settings::resolve(global, &cfg);

            let mut effective = cfg;
            effective.store.path = Some(settings.store_path);

            let out = match settings.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&effective)?,
                format => {
                    output::render_single(format, &effective, |_| String::new(), |_| String::new())?
                }
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            // Config is optional here; a broken file should not hide its own location.
            let cfg = config::load_config_or_default();
            let lines = [
                format!("config: {}", config::config_path().display()),
                format!("store:  {}", config::store_path(global, &cfg).display()),
            ];
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }
    }
}
