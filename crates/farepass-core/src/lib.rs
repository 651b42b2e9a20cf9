//! Fare-ticket model and file-backed ticket registry.
//!
//! - **[`Ticket`]**: one shared record (id, activation time, balance,
//!   append-only [`ActivityLogEntry`] history) over a closed set of
//!   variants ([`TicketKind`]): unlimited passes, time-limited passes, and
//!   trip-limited passes. [`Ticket::redeem`] returns `false` for a refused
//!   redemption rather than an error.
//!
//! - **[`TicketRegistry`]**: insertion-ordered tickets, unique by id,
//!   mirrored to a JSON file that is rewritten atomically after every
//!   structural change. Records of unknown type are skipped on load;
//!   [`LoadPolicy`] decides whether an unreadable file is an error or a
//!   logged recovery.
//!
//! - **[`TicketRecord`]**: the discriminated on-disk form every ticket
//!   serializes through.

pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use model::{ActivityLogEntry, Ticket, TicketId, TicketKind, TicketStatus, TicketType};
pub use store::{LoadPolicy, TicketRecord, TicketRegistry};
