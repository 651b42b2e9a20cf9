// ── File-backed ticket registry ──
//
// An insertion-ordered `Vec<Ticket>` mirrored to a JSON file. Every
// structural change rewrites the whole file before returning.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, warn};

use super::file;
use super::record::TicketRecord;
use crate::error::CoreError;
use crate::model::{Ticket, TicketId};

/// What to do when the backing file exists but cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log the failure, keep a `.corrupt` copy of the file, and start empty.
    #[default]
    Recover,
    /// Fail with [`CoreError::CorruptStore`].
    Strict,
}

/// The durable collection of all known tickets, unique by id.
#[derive(Debug)]
pub struct TicketRegistry {
    path: PathBuf,
    tickets: Vec<Ticket>,
}

impl TicketRegistry {
    /// Open (or initialize) the registry at `path`, recovering from a
    /// corrupt file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::open_with(path, LoadPolicy::default())
    }

    /// Open (or initialize) the registry at `path`.
    ///
    /// A missing file is created empty straight away. Records whose `type`
    /// this version does not know are skipped; any other decoding failure
    /// is handled according to `policy`.
    pub fn open_with(path: impl Into<PathBuf>, policy: LoadPolicy) -> Result<Self, CoreError> {
        let path = path.into();

        let Some(contents) = file::read_optional(&path)? else {
            let registry = Self {
                path,
                tickets: Vec::new(),
            };
            registry.persist()?;
            debug!(path = %registry.path.display(), "initialized empty ticket store");
            return Ok(registry);
        };

        let tickets = match decode(&contents) {
            Ok(tickets) => tickets,
            Err(reason) => match policy {
                LoadPolicy::Strict => return Err(CoreError::CorruptStore { path, reason }),
                LoadPolicy::Recover => {
                    let backup = file::preserve_corrupt(&path)?;
                    error!(
                        path = %path.display(),
                        backup = %backup.display(),
                        %reason,
                        "ticket store unreadable, starting empty"
                    );
                    Vec::new()
                }
            },
        };

        debug!(path = %path.display(), count = tickets.len(), "loaded ticket store");
        Ok(Self { path, tickets })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tickets in insertion order.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticket> {
        self.tickets.iter()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn find(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id() == id)
    }

    /// Live handle to a stored ticket. Changes made through it reach the
    /// backing file on the next [`persist`](Self::persist).
    pub fn find_mut(&mut self, id: &TicketId) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id() == id)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Insert `ticket`, replacing (not merging) any ticket with the same id.
    ///
    /// A replaced ticket moves to the end of the order and is returned.
    pub fn upsert(&mut self, ticket: Ticket) -> Result<Option<Ticket>, CoreError> {
        let replaced = self.take(ticket.id());
        debug!(id = %ticket.id(), replaced = replaced.is_some(), "upserting ticket");
        self.tickets.push(ticket);
        self.persist()?;
        Ok(replaced)
    }

    /// Remove the ticket with `id`. Returns whether anything was removed;
    /// the file is only rewritten when something was.
    pub fn remove(&mut self, id: &TicketId) -> Result<bool, CoreError> {
        if self.take(id).is_none() {
            return Ok(false);
        }
        debug!(%id, "removed ticket");
        self.persist()?;
        Ok(true)
    }

    /// Apply `f` to the ticket with `id`, persisting only if it changed.
    ///
    /// Returns `None` without touching the file if the id is unknown. A
    /// refused redemption or rejected operation leaves the file as is.
    pub fn update<R>(
        &mut self,
        id: &TicketId,
        f: impl FnOnce(&mut Ticket) -> R,
    ) -> Result<Option<R>, CoreError> {
        let Some(ticket) = self.find_mut(id) else {
            return Ok(None);
        };
        let before = ticket.clone();
        let out = f(&mut *ticket);
        if *ticket == before {
            debug!(%id, "ticket unchanged, store left as is");
        } else {
            self.persist()?;
        }
        Ok(Some(out))
    }

    /// Rewrite the backing file with every ticket.
    pub fn persist(&self) -> Result<(), CoreError> {
        let json = serde_json::to_vec_pretty(&self.tickets)?;
        file::write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), count = self.tickets.len(), "persisted ticket store");
        Ok(())
    }

    fn take(&mut self, id: &TicketId) -> Option<Ticket> {
        let index = self.tickets.iter().position(|t| t.id() == id)?;
        Some(self.tickets.remove(index))
    }
}

impl<'a> IntoIterator for &'a TicketRegistry {
    type Item = &'a Ticket;
    type IntoIter = std::slice::Iter<'a, Ticket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for TicketRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket registry ({} tickets):", self.tickets.len())?;
        for ticket in &self.tickets {
            write!(f, "\n{ticket}")?;
        }
        Ok(())
    }
}

/// Decode the store contents, skipping unknown record types. Later
/// records win over earlier ones with the same id.
fn decode(contents: &str) -> Result<Vec<Ticket>, String> {
    let raw: Vec<Value> = serde_json::from_str(contents).map_err(|e| e.to_string())?;

    let mut tickets: Vec<Ticket> = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        if TicketRecord::classify(&value).is_none() {
            warn!(
                index,
                kind = ?value.get("type"),
                "skipping ticket record of unknown type"
            );
            continue;
        }
        let record: TicketRecord =
            serde_json::from_value(value).map_err(|e| format!("record {index}: {e}"))?;
        let ticket = Ticket::try_from(record).map_err(|e| format!("record {index}: {e}"))?;

        if let Some(pos) = tickets.iter().position(|t| t.id() == ticket.id()) {
            warn!(id = %ticket.id(), "duplicate ticket id in store, keeping the later record");
            tickets.remove(pos);
        }
        tickets.push(ticket);
    }
    Ok(tickets)
}
