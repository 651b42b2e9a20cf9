//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use farepass_config::ConfigError;
use farepass_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const REFUSED: i32 = 6;
    pub const CONFLICT: i32 = 7;
    pub const CORRUPT_STORE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Tickets ──────────────────────────────────────────────────────

    #[error("Ticket '{identifier}' not found")]
    #[diagnostic(
        code(farepass::not_found),
        help("Run: farepass list to see issued tickets")
    )]
    NotFound { identifier: String },

    #[error("Ticket '{id}' refused redemption ({status})")]
    #[diagnostic(
        code(farepass::refused),
        help("Run: farepass show {id} for details")
    )]
    Refused { id: String, status: String },

    #[error("Operation '{operation}' is not supported by {ticket_type}")]
    #[diagnostic(
        code(farepass::unsupported),
        help(
            "deactivate applies to unlimited passes only;\n\
             set-balance applies to trip-limited passes only."
        )
    )]
    Unsupported {
        operation: String,
        ticket_type: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(farepass::validation))]
    Validation { field: String, reason: String },

    // ── Store ────────────────────────────────────────────────────────

    #[error("Ticket store at {path} is unreadable")]
    #[diagnostic(
        code(farepass::corrupt_store),
        help(
            "{reason}\n\
             Repair or move the file aside, or run without --strict to start\n\
             with an empty store (a .corrupt copy is kept)."
        )
    )]
    CorruptStore { path: String, reason: String },

    #[error("Ticket store error: {message}")]
    #[diagnostic(code(farepass::store))]
    Store { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(farepass::config),
        help("Check the config file (farepass config path) and FAREPASS_* variables.")
    )]
    Config(Box<figment::Error>),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(farepass::conflict),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(farepass::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(farepass::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(farepass::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(farepass::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Refused { .. } => exit_code::REFUSED,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::CorruptStore { .. } => exit_code::CORRUPT_STORE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, reason } => Self::Validation { field, reason },

            CoreError::Unsupported {
                operation,
                ticket_type,
            } => Self::Unsupported {
                operation,
                ticket_type,
            },

            CoreError::CorruptStore { path, reason } => Self::CorruptStore {
                path: path.display().to_string(),
                reason,
            },

            CoreError::InvalidRecord { reason } => Self::Store { message: reason },

            CoreError::Io { path, source } => Self::Store {
                message: format!("{}: {source}", path.display()),
            },

            CoreError::Serialization(e) => Self::Json(e),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Serialization(e) => Self::Toml(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn core_validation_maps_to_usage_exit() {
        let err = CliError::from(CoreError::Validation {
            field: "balance".into(),
            reason: "must not be negative, got -1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(
            err.to_string(),
            "Invalid value for balance: must not be negative, got -1"
        );
    }

    #[test]
    fn corrupt_store_keeps_its_path() {
        let err = CliError::from(CoreError::CorruptStore {
            path: PathBuf::from("/tmp/tickets.json"),
            reason: "expected value at line 1 column 1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CORRUPT_STORE);
        assert!(err.to_string().contains("/tmp/tickets.json"));
    }

    #[test]
    fn unsupported_operation_has_its_own_exit_code() {
        let err = CliError::from(CoreError::Unsupported {
            operation: "deactivate".into(),
            ticket_type: "TripLimitedPass".into(),
        });
        assert_eq!(err.exit_code(), exit_code::UNSUPPORTED);
    }

    #[test]
    fn invalid_record_is_a_store_error() {
        let err = CliError::from(CoreError::InvalidRecord {
            reason: "ticket T1: trip_allowance 5 does not match balance 3".into(),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert!(err.to_string().contains("does not match balance"));
    }

    #[test]
    fn refusal_is_distinct_from_failure() {
        let err = CliError::Refused {
            id: "T1".into(),
            status: "exhausted".into(),
        };
        assert_eq!(err.exit_code(), exit_code::REFUSED);
        assert_ne!(exit_code::REFUSED, exit_code::GENERAL);
    }
}
