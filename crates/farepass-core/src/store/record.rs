// ── Persisted ticket records ──
//
// One JSON object per ticket, discriminated by a `type` field. `Ticket`
// serializes through `TicketRecord`, so the wire shape lives only here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{ActivityLogEntry, Ticket, TicketId, TicketKind, TicketType, timestamp};

/// Fields every ticket record carries, regardless of variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonFields {
    pub id: TicketId,
    #[serde(with = "timestamp")]
    pub activated_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<ActivityLogEntry>,
    pub balance: u32,
}

/// The discriminated on-disk form of a [`Ticket`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TicketRecord {
    UnlimitedPass {
        #[serde(flatten)]
        common: CommonFields,
        active: bool,
    },
    TimeLimitedPass {
        #[serde(flatten)]
        common: CommonFields,
        #[serde(with = "timestamp")]
        expires_at: DateTime<Utc>,
    },
    TripLimitedPass {
        #[serde(flatten)]
        common: CommonFields,
        trip_allowance: u32,
    },
}

impl TicketRecord {
    /// Read the discriminant of a raw record without decoding the rest.
    ///
    /// `None` means the record is not one this version understands.
    pub fn classify(raw: &Value) -> Option<TicketType> {
        raw.get("type")?.as_str()?.parse().ok()
    }

    pub fn ticket_type(&self) -> TicketType {
        match self {
            Self::UnlimitedPass { .. } => TicketType::UnlimitedPass,
            Self::TimeLimitedPass { .. } => TicketType::TimeLimitedPass,
            Self::TripLimitedPass { .. } => TicketType::TripLimitedPass,
        }
    }
}

impl From<Ticket> for TicketRecord {
    fn from(ticket: Ticket) -> Self {
        let (id, activated_at, history, balance, kind) = ticket.into_parts();
        let common = CommonFields {
            id,
            activated_at,
            history,
            balance,
        };
        match kind {
            TicketKind::Unlimited { active } => Self::UnlimitedPass { common, active },
            TicketKind::TimeLimited { expires_at } => Self::TimeLimitedPass { common, expires_at },
            TicketKind::TripLimited { trip_allowance } => Self::TripLimitedPass {
                common,
                trip_allowance,
            },
        }
    }
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = CoreError;

    fn try_from(record: TicketRecord) -> Result<Self, Self::Error> {
        let (common, kind) = match record {
            TicketRecord::UnlimitedPass { common, active } => {
                (common, TicketKind::Unlimited { active })
            }
            TicketRecord::TimeLimitedPass { common, expires_at } => {
                if !timestamp::is_storable(&expires_at) {
                    return Err(CoreError::invalid_record(format!(
                        "ticket {}: expires_at {expires_at} is past the year {}",
                        common.id,
                        timestamp::MAX_YEAR
                    )));
                }
                if expires_at < common.activated_at {
                    return Err(CoreError::invalid_record(format!(
                        "ticket {}: expires_at precedes activated_at",
                        common.id
                    )));
                }
                (common, TicketKind::TimeLimited { expires_at })
            }
            TicketRecord::TripLimitedPass {
                common,
                trip_allowance,
            } => {
                if trip_allowance != common.balance {
                    return Err(CoreError::invalid_record(format!(
                        "ticket {}: trip_allowance {trip_allowance} does not match balance {}",
                        common.id, common.balance
                    )));
                }
                (common, TicketKind::TripLimited { trip_allowance })
            }
        };

        if !timestamp::is_storable(&common.activated_at) {
            return Err(CoreError::invalid_record(format!(
                "ticket {}: activated_at {} is outside the storable range",
                common.id, common.activated_at
            )));
        }

        Ok(Ticket::restore(
            common.id,
            common.activated_at,
            common.history,
            common.balance,
            kind,
        ))
    }
}
