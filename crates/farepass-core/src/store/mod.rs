// ── Ticket persistence ──
//
// `record` defines the discriminated on-disk shape of a ticket;
// `registry` owns the in-memory collection and its backing file.

pub(crate) mod file;
pub mod record;
pub mod registry;

pub use record::TicketRecord;
pub use registry::{LoadPolicy, TicketRegistry};
