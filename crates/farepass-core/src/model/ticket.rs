// ── Ticket domain types ──
//
// A ticket is one shared record (id, activation time, history, balance)
// plus a closed set of variant-specific states. Redemption rules are a
// single `match` on the variant, so adding a variant is a compile error
// everywhere it needs handling.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::activity::ActivityLogEntry;
use super::ticket_id::TicketId;
use super::timestamp;
use crate::error::CoreError;
use crate::store::record::TicketRecord;

/// Persisted discriminant for each ticket variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
pub enum TicketType {
    UnlimitedPass,
    TimeLimitedPass,
    TripLimitedPass,
}

impl TicketType {
    /// Short human label used in tables and messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::UnlimitedPass => "unlimited",
            Self::TimeLimitedPass => "time-limited",
            Self::TripLimitedPass => "trip-limited",
        }
    }
}

/// Variant-specific ticket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    /// Valid until explicitly deactivated.
    Unlimited { active: bool },
    /// Valid up to and including `expires_at`.
    TimeLimited { expires_at: DateTime<Utc> },
    /// Valid while trips remain; mirrors the ticket balance.
    TripLimited { trip_allowance: u32 },
}

impl TicketKind {
    pub fn ticket_type(&self) -> TicketType {
        match self {
            Self::Unlimited { .. } => TicketType::UnlimitedPass,
            Self::TimeLimited { .. } => TicketType::TimeLimitedPass,
            Self::TripLimited { .. } => TicketType::TripLimitedPass,
        }
    }
}

/// Observable redemption state, derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Deactivated,
    Expired,
    Exhausted,
}

/// A fare ticket.
///
/// `id` and `activated_at` never change after construction, and `history`
/// is append-only. Successful redemptions and administrative changes each
/// append exactly one [`ActivityLogEntry`]; refusals append nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TicketRecord", try_from = "TicketRecord")]
pub struct Ticket {
    id: TicketId,
    activated_at: DateTime<Utc>,
    history: Vec<ActivityLogEntry>,
    balance: u32,
    kind: TicketKind,
}

impl Ticket {
    // ── Construction ─────────────────────────────────────────────────

    /// An unlimited pass activated now.
    pub fn unlimited(id: TicketId) -> Self {
        Self::unlimited_at(id, Utc::now())
    }

    pub fn unlimited_at(id: TicketId, activated_at: DateTime<Utc>) -> Self {
        Self::restore(
            id,
            activated_at,
            Vec::new(),
            0,
            TicketKind::Unlimited { active: true },
        )
    }

    /// A pass valid for `validity_days` whole days from now.
    pub fn time_limited(id: TicketId, validity_days: i64) -> Result<Self, CoreError> {
        Self::time_limited_at(id, validity_days, Utc::now())
    }

    pub fn time_limited_at(
        id: TicketId,
        validity_days: i64,
        activated_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if validity_days < 0 {
            return Err(CoreError::validation(
                "validity_days",
                format!("must not be negative, got {validity_days}"),
            ));
        }
        let expires_at = Duration::try_days(validity_days)
            .and_then(|period| activated_at.checked_add_signed(period))
            .ok_or_else(|| {
                CoreError::validation(
                    "validity_days",
                    format!("{validity_days} days is out of range"),
                )
            })?;
        if !timestamp::is_storable(&expires_at) {
            return Err(CoreError::validation(
                "validity_days",
                format!(
                    "{validity_days} days runs past the year {}",
                    timestamp::MAX_YEAR
                ),
            ));
        }

        Ok(Self::restore(
            id,
            activated_at,
            Vec::new(),
            0,
            TicketKind::TimeLimited { expires_at },
        ))
    }

    /// A pass holding `allowance` trips, activated now.
    pub fn trip_limited(id: TicketId, allowance: i64) -> Result<Self, CoreError> {
        Self::trip_limited_at(id, allowance, Utc::now())
    }

    pub fn trip_limited_at(
        id: TicketId,
        allowance: i64,
        activated_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let trips = trip_count("trip_allowance", allowance)?;
        Ok(Self::restore(
            id,
            activated_at,
            Vec::new(),
            trips,
            TicketKind::TripLimited {
                trip_allowance: trips,
            },
        ))
    }

    /// Reassemble a ticket from already-validated parts.
    ///
    /// Every variant goes through here, both for fresh tickets and for
    /// records read back from the store.
    pub(crate) fn restore(
        id: TicketId,
        activated_at: DateTime<Utc>,
        history: Vec<ActivityLogEntry>,
        balance: u32,
        kind: TicketKind,
    ) -> Self {
        Self {
            id,
            activated_at,
            history,
            balance,
            kind,
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        TicketId,
        DateTime<Utc>,
        Vec<ActivityLogEntry>,
        u32,
        TicketKind,
    ) {
        (
            self.id,
            self.activated_at,
            self.history,
            self.balance,
            self.kind,
        )
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> &TicketId {
        &self.id
    }

    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    pub fn history(&self) -> &[ActivityLogEntry] {
        &self.history
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn kind(&self) -> &TicketKind {
        &self.kind
    }

    pub fn ticket_type(&self) -> TicketType {
        self.kind.ticket_type()
    }

    // ── Redemption ───────────────────────────────────────────────────

    /// Redeem one trip now. See [`Ticket::redeem_at`].
    pub fn redeem(&mut self) -> bool {
        self.redeem_at(Utc::now())
    }

    /// Try to consume one trip at `now`.
    ///
    /// Refusal (deactivated, expired, exhausted) is a normal outcome and
    /// leaves the ticket untouched.
    pub fn redeem_at(&mut self, now: DateTime<Utc>) -> bool {
        let description = match &mut self.kind {
            TicketKind::Unlimited { active } => {
                if !*active {
                    return false;
                }
                "Trip redeemed (unlimited pass)".to_owned()
            }
            TicketKind::TimeLimited { expires_at } => {
                if now > *expires_at {
                    return false;
                }
                "Trip redeemed (within validity period)".to_owned()
            }
            TicketKind::TripLimited { trip_allowance } => {
                if self.balance == 0 {
                    return false;
                }
                self.balance -= 1;
                *trip_allowance = self.balance;
                format!("Trip redeemed, {} remaining", self.balance)
            }
        };

        self.history.push(ActivityLogEntry::at(description, now));
        true
    }

    // ── Administrative operations ────────────────────────────────────

    /// Deactivate an unlimited pass now. See [`Ticket::deactivate_at`].
    pub fn deactivate(&mut self) -> Result<bool, CoreError> {
        self.deactivate_at(Utc::now())
    }

    /// Permanently deactivate an unlimited pass.
    ///
    /// Returns `false` if the pass was already inactive; nothing is logged
    /// in that case.
    pub fn deactivate_at(&mut self, now: DateTime<Utc>) -> Result<bool, CoreError> {
        let TicketKind::Unlimited { active } = &mut self.kind else {
            return Err(self.unsupported("deactivate"));
        };
        if !*active {
            return Ok(false);
        }
        *active = false;
        self.history
            .push(ActivityLogEntry::at("Pass deactivated", now));
        Ok(true)
    }

    /// Overwrite the remaining trips now. See [`Ticket::set_balance_at`].
    pub fn set_balance(&mut self, value: i64) -> Result<(), CoreError> {
        self.set_balance_at(value, Utc::now())
    }

    /// Overwrite the remaining trips of a trip-limited pass.
    ///
    /// Negative values are rejected before anything is modified.
    pub fn set_balance_at(&mut self, value: i64, now: DateTime<Utc>) -> Result<(), CoreError> {
        if !matches!(self.kind, TicketKind::TripLimited { .. }) {
            return Err(self.unsupported("set balance"));
        }
        let trips = trip_count("balance", value)?;

        self.balance = trips;
        self.kind = TicketKind::TripLimited {
            trip_allowance: trips,
        };
        self.history
            .push(ActivityLogEntry::at(format!("Balance set to {trips}"), now));
        Ok(())
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn status(&self) -> TicketStatus {
        self.status_at(Utc::now())
    }

    /// Redemption state at `now`; never mutates the ticket.
    pub fn status_at(&self, now: DateTime<Utc>) -> TicketStatus {
        match self.kind {
            TicketKind::Unlimited { active: true } => TicketStatus::Active,
            TicketKind::Unlimited { active: false } => TicketStatus::Deactivated,
            TicketKind::TimeLimited { expires_at } if now <= expires_at => TicketStatus::Active,
            TicketKind::TimeLimited { .. } => TicketStatus::Expired,
            TicketKind::TripLimited { .. } if self.balance > 0 => TicketStatus::Active,
            TicketKind::TripLimited { .. } => TicketStatus::Exhausted,
        }
    }

    /// Whether a redemption at `now` would succeed.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == TicketStatus::Active
    }

    fn unsupported(&self, operation: &str) -> CoreError {
        CoreError::Unsupported {
            operation: operation.into(),
            ticket_type: self.ticket_type().to_string(),
        }
    }
}

/// Validate a caller-supplied trip count.
fn trip_count(field: &str, value: i64) -> Result<u32, CoreError> {
    if value < 0 {
        return Err(CoreError::validation(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| CoreError::validation(field, format!("{value} exceeds {}", u32::MAX)))
}

const DISPLAY_TIME: &str = "%Y-%m-%d %H:%M";

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket {}, activated {}",
            self.id,
            self.activated_at.format(DISPLAY_TIME)
        )?;
        match self.kind {
            TicketKind::Unlimited { active: true } => f.write_str(", unlimited (active)"),
            TicketKind::Unlimited { active: false } => f.write_str(", unlimited (deactivated)"),
            TicketKind::TimeLimited { expires_at } => {
                write!(f, ", valid until {}", expires_at.format(DISPLAY_TIME))
            }
            TicketKind::TripLimited { .. } => write!(f, ", {} trips left", self.balance),
        }
    }
}
