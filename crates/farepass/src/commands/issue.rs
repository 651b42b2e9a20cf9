//! `farepass issue` handler.

use chrono::Utc;

use farepass_core::{Ticket, TicketRegistry};

use crate::cli::{IssueArgs, IssueCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{tickets, util};

pub fn handle(
    registry: &mut TicketRegistry,
    args: IssueArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let ticket = build(args.command, settings)?;
    let id = ticket.id().clone();

    if let Some(previous) = registry.upsert(ticket)? {
        tracing::info!(id = %id, previous = %previous.ticket_type(), "replaced existing ticket");
        output::print_notice(
            &format!(
                "Replaced existing {} ticket {id}",
                previous.ticket_type().label()
            ),
            settings.quiet,
        );
    }

    let issued = util::find(registry, &id)?;
    let now = Utc::now();
    let out = output::render_single(
        settings.output,
        issued,
        |t| tickets::detail(t, now, settings.color),
        |t| t.id().to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

fn build(command: IssueCommand, settings: &Settings) -> Result<Ticket, CliError> {
    let ticket = match command {
        IssueCommand::Unlimited { id } => Ticket::unlimited(util::parse_id(&id)?),
        IssueCommand::TimeLimited { id, days } => Ticket::time_limited(
            util::parse_id(&id)?,
            days.unwrap_or_else(|| i64::from(settings.validity_days)),
        )?,
        IssueCommand::Trips { id, trips } => Ticket::trip_limited(
            util::parse_id(&id)?,
            trips.unwrap_or_else(|| i64::from(settings.trips)),
        )?,
    };
    Ok(ticket)
}
