//! Shared helpers for command handlers.

use std::io::IsTerminal;

use farepass_core::{Ticket, TicketId, TicketRegistry};

use crate::error::CliError;

/// Parse a ticket id from the command line.
pub fn parse_id(raw: &str) -> Result<TicketId, CliError> {
    Ok(raw.parse::<TicketId>()?)
}

/// Look up a ticket, mapping absence to a not-found error.
pub fn find<'a>(registry: &'a TicketRegistry, id: &TicketId) -> Result<&'a Ticket, CliError> {
    registry
        .find(id)
        .ok_or_else(|| CliError::not_found(id.as_str()))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
