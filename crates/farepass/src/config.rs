//! CLI configuration: thin wrapper around `farepass_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--store, --output, --strict, ...).

use std::path::PathBuf;

use clap::ValueEnum;

use farepass_core::{LoadPolicy, TicketRegistry};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use farepass_config::{Config, config_path, load_config, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Settings every ticket command needs, after flag overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_path: PathBuf,
    pub load_policy: LoadPolicy,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
    pub validity_days: u32,
    pub trips: u32,
}

impl Settings {
    /// Merge config values with global flags. Flags take priority.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Self {
        let output = global.output.unwrap_or_else(|| {
            OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Table)
        });
        let color = global.color.unwrap_or_else(|| {
            ColorMode::from_str(&cfg.defaults.color, true).unwrap_or(ColorMode::Auto)
        });
        let load_policy = if global.strict {
            LoadPolicy::Strict
        } else {
            cfg.load_policy()
        };

        Self {
            store_path: store_path(global, cfg),
            load_policy,
            output,
            color: output::should_color(color),
            quiet: global.quiet,
            yes: global.yes,
            validity_days: cfg.defaults.validity_days,
            trips: cfg.defaults.trips,
        }
    }

    /// Open the ticket store these settings point at.
    pub fn open_registry(&self) -> Result<TicketRegistry, CliError> {
        tracing::debug!(path = %self.store_path.display(), policy = ?self.load_policy, "opening ticket store");
        Ok(TicketRegistry::open_with(&self.store_path, self.load_policy)?)
    }
}

/// Ticket store location: `--store` flag, then config, then platform default.
pub fn store_path(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    global.store.clone().unwrap_or_else(|| cfg.store_path())
}
