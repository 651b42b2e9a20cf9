// ── Activity log ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp;

/// One redemption or administrative event recorded on a ticket.
///
/// Entries are immutable once created; a ticket's history only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    description: String,
    #[serde(with = "timestamp")]
    occurred_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Record an event happening now.
    pub fn new(description: impl Into<String>) -> Self {
        Self::at(description, Utc::now())
    }

    /// Record an event at an explicit instant.
    pub fn at(description: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            occurred_at,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl fmt::Display for ActivityLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            timestamp::format(&self.occurred_at),
            self.description
        )
    }
}
