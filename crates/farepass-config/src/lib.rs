//! Shared configuration for the farepass CLI.
//!
//! TOML config file, `FAREPASS_*` environment overrides, and resolution of
//! the ticket store location. The CLI layers its own flag overrides on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use farepass_core::LoadPolicy;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Where tickets are stored and how an unreadable store is treated.
    #[serde(default)]
    pub store: StoreConfig,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Backing file; the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub on_corrupt: CorruptStorePolicy,
}

/// Reaction to a ticket store that exists but cannot be read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptStorePolicy {
    /// Keep a `.corrupt` copy and continue with an empty store.
    #[default]
    Recover,
    /// Refuse to start.
    Fail,
}

impl From<CorruptStorePolicy> for LoadPolicy {
    fn from(policy: CorruptStorePolicy) -> Self {
        match policy {
            CorruptStorePolicy::Recover => Self::Recover,
            CorruptStorePolicy::Fail => Self::Strict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Validity period for new time-limited passes.
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// Allowance for new trip-limited passes.
    #[serde(default = "default_trips")]
    pub trips: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            validity_days: default_validity_days(),
            trips: default_trips(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_validity_days() -> u32 {
    30
}
fn default_trips() -> u32 {
    10
}

const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
const COLOR_MODES: &[&str] = &["auto", "always", "never"];

impl Config {
    /// Resolved backing-file path for the ticket store.
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(default_store_path)
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.store.on_corrupt.into()
    }

    /// Reject values the CLI could not act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_one_of("defaults.output", &self.defaults.output, OUTPUT_FORMATS)?;
        check_one_of("defaults.color", &self.defaults.color, COLOR_MODES)?;
        if self.store.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Validation {
                field: "store.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Validation {
        field: field.into(),
        reason: format!("expected one of {}, got '{value}'", allowed.join(", ")),
    })
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "farepass", "farepass")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default ticket store location in the platform data directory.
pub fn default_store_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("tickets.json"),
        |dirs| dirs.data_dir().join("tickets.json"),
    )
}

fn home_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("farepass");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path + environment.
///
/// Environment variables use `__` for nesting, e.g.
/// `FAREPASS_STORE__ON_CORRUPT=fail`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FAREPASS_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if it can't be loaded.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    fn load(path: &str) -> Result<Config, figment::Error> {
        load_config_from(Path::new(path)).map_err(|e| e.to_string().into())
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load("absent.toml")?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.load_policy(), LoadPolicy::Recover);
            assert_eq!(cfg.defaults.validity_days, 30);
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [store]
                path = "/var/lib/farepass/tickets.json"
                on_corrupt = "fail"

                [defaults]
                trips = 20
                "#,
            )?;
            let cfg = load("config.toml")?;
            assert_eq!(
                cfg.store_path(),
                PathBuf::from("/var/lib/farepass/tickets.json")
            );
            assert_eq!(cfg.load_policy(), LoadPolicy::Strict);
            assert_eq!(cfg.defaults.trips, 20);
            assert_eq!(cfg.defaults.output, "table");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\noutput = \"yaml\"\n")?;
            jail.set_env("FAREPASS_DEFAULTS__OUTPUT", "json");
            jail.set_env("FAREPASS_STORE__ON_CORRUPT", "fail");
            let cfg = load("config.toml")?;
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.store.on_corrupt, CorruptStorePolicy::Fail);
            Ok(())
        });
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\noutput = \"xml\"\n")?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "defaults.output"));
            Ok(())
        });
    }

    #[test]
    fn save_then_load_round_trips() {
        Jail::expect_with(|jail| {
            let mut cfg = Config::default();
            cfg.store.path = Some(jail.directory().join("data").join("tickets.json"));
            cfg.defaults.validity_days = 7;

            let path = jail.directory().join("nested").join("config.toml");
            save_config_to(&cfg, &path).map_err(|e| e.to_string())?;
            let loaded = load_config_from(&path).map_err(|e| e.to_string())?;
            assert_eq!(loaded, cfg);
            Ok(())
        });
    }

    #[test]
    fn default_store_path_is_a_json_file() {
        assert_eq!(
            default_store_path().file_name().unwrap(),
            "tickets.json"
        );
    }
}
