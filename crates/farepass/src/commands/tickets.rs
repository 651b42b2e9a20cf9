//! Read-side ticket handlers: list, show, status, history, plus remove.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use farepass_core::model::timestamp;
use farepass_core::{ActivityLogEntry, Ticket, TicketKind, TicketRegistry, TicketStatus, TicketType};

use crate::cli::{KindFilter, ListArgs, StatusFilter, TicketRef};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Trips")]
    trips: String,
    #[tabled(rename = "Activated")]
    activated: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Events")]
    events: usize,
}

impl TicketRow {
    fn new(ticket: &Ticket, now: DateTime<Utc>) -> Self {
        Self {
            id: ticket.id().to_string(),
            kind: ticket.ticket_type().label().into(),
            status: ticket.status_at(now).to_string(),
            trips: trips_cell(ticket),
            activated: ticket.activated_at().format(TIME_FORMAT).to_string(),
            expires: expiry(ticket)
                .map_or_else(|| "-".into(), |e| e.format(TIME_FORMAT).to_string()),
            events: ticket.history().len(),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Event")]
    description: String,
}

/// Machine-readable answer to `farepass status`.
#[derive(Debug, Serialize)]
struct StatusView {
    id: String,
    #[serde(rename = "type")]
    ticket_type: TicketType,
    status: TicketStatus,
    balance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
}

fn trips_cell(ticket: &Ticket) -> String {
    match ticket.kind() {
        TicketKind::TripLimited { .. } => ticket.balance().to_string(),
        TicketKind::Unlimited { .. } | TicketKind::TimeLimited { .. } => "-".into(),
    }
}

fn expiry(ticket: &Ticket) -> Option<DateTime<Utc>> {
    match ticket.kind() {
        TicketKind::TimeLimited { expires_at } => Some(*expires_at),
        TicketKind::Unlimited { .. } | TicketKind::TripLimited { .. } => None,
    }
}

pub(super) fn detail(ticket: &Ticket, now: DateTime<Utc>, color: bool) -> String {
    let mut lines = vec![
        format!("ID:         {}", ticket.id()),
        format!("Kind:       {}", ticket.ticket_type().label()),
        format!(
            "Status:     {}",
            output::status_label(ticket.status_at(now), color)
        ),
        format!(
            "Activated:  {}",
            ticket.activated_at().format(TIME_FORMAT)
        ),
    ];
    match ticket.kind() {
        TicketKind::Unlimited { active } => {
            lines.push(format!("Active:     {active}"));
        }
        TicketKind::TimeLimited { expires_at } => {
            lines.push(format!("Expires:    {}", expires_at.format(TIME_FORMAT)));
        }
        TicketKind::TripLimited { .. } => {
            lines.push(format!("Trips left: {}", ticket.balance()));
        }
    }
    lines.push(format!("Events:     {}", ticket.history().len()));
    if let Some(last) = ticket.history().last() {
        lines.push(format!("Last event: {last}"));
    }
    lines.join("\n")
}

fn matches_filters(ticket: &Ticket, args: &ListArgs, now: DateTime<Utc>) -> bool {
    let status_ok = args.status.is_none_or(|wanted| {
        let status = ticket.status_at(now);
        matches!(
            (wanted, status),
            (StatusFilter::Active, TicketStatus::Active)
                | (StatusFilter::Deactivated, TicketStatus::Deactivated)
                | (StatusFilter::Expired, TicketStatus::Expired)
                | (StatusFilter::Exhausted, TicketStatus::Exhausted)
        )
    });
    let kind_ok = args.kind.is_none_or(|wanted| {
        matches!(
            (wanted, ticket.ticket_type()),
            (KindFilter::Unlimited, TicketType::UnlimitedPass)
                | (KindFilter::TimeLimited, TicketType::TimeLimitedPass)
                | (KindFilter::TripLimited, TicketType::TripLimitedPass)
        )
    });
    status_ok && kind_ok
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(registry: &TicketRegistry, args: &ListArgs, settings: &Settings) -> Result<(), CliError> {
    let now = Utc::now();
    let selected: Vec<Ticket> = registry
        .iter()
        .filter(|t| matches_filters(t, args, now))
        .cloned()
        .collect();

    let out = output::render_list(
        settings.output,
        &selected,
        |t| TicketRow::new(t, now),
        |t| t.id().to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

pub fn show(registry: &TicketRegistry, args: &TicketRef, settings: &Settings) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;
    let ticket = util::find(registry, &id)?;
    let now = Utc::now();

    let out = output::render_single(
        settings.output,
        ticket,
        |t| detail(t, now, settings.color),
        |t| t.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

pub fn status(registry: &TicketRegistry, args: &TicketRef, settings: &Settings) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;
    let ticket = util::find(registry, &id)?;
    let view = StatusView {
        id: ticket.id().to_string(),
        ticket_type: ticket.ticket_type(),
        status: ticket.status(),
        balance: ticket.balance(),
        expires_at: expiry(ticket).as_ref().map(timestamp::format),
    };

    let out = output::render_single(
        settings.output,
        &view,
        |v| format!("{}: {}", v.id, output::status_label(v.status, settings.color)),
        |v| v.status.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

pub fn history(registry: &TicketRegistry, args: &TicketRef, settings: &Settings) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;
    let ticket = util::find(registry, &id)?;

    let out = output::render_list(
        settings.output,
        ticket.history(),
        |e: &ActivityLogEntry| HistoryRow {
            when: e.occurred_at().format("%Y-%m-%d %H:%M:%S").to_string(),
            description: e.description().into(),
        },
        |e| e.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

pub fn remove(registry: &mut TicketRegistry, args: &TicketRef, settings: &Settings) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;
    if registry.find(&id).is_none() {
        return Err(CliError::not_found(id.as_str()));
    }
    if !util::confirm(&format!("Remove ticket {id}?"), "remove", settings.yes)? {
        return Ok(());
    }
    registry.remove(&id)?;
    output::print_notice(&format!("Ticket {id} removed"), settings.quiet);
    Ok(())
}
