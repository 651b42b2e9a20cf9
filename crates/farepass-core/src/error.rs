// ── Core error types ──
//
// Errors surfaced by farepass-core. Redemption refusals and lookups of
// unknown ids are NOT errors -- those come back as `bool` / `Option`.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Operation '{operation}' is not supported by {ticket_type}")]
    Unsupported {
        operation: String,
        ticket_type: String,
    },

    // ── Persisted data errors ────────────────────────────────────────
    #[error("Invalid ticket record: {reason}")]
    InvalidRecord { reason: String },

    #[error("Ticket store at {} is unreadable: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    // ── IO / serialization ───────────────────────────────────────────
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
