// ── Domain model ──
//
// Tickets, their identifiers, and the activity log they carry.

pub mod activity;
pub mod ticket;
pub mod ticket_id;
pub mod timestamp;

pub use activity::ActivityLogEntry;
pub use ticket::{Ticket, TicketKind, TicketStatus, TicketType};
pub use ticket_id::TicketId;
