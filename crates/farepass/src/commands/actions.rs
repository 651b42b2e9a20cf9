//! Mutating ticket handlers: redeem, deactivate, set-balance.

use chrono::Utc;

use farepass_core::{TicketId, TicketRegistry};

use crate::cli::{SetBalanceArgs, TicketRef};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{tickets, util};

pub fn redeem(
    registry: &mut TicketRegistry,
    args: &TicketRef,
    settings: &Settings,
) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;
    let now = Utc::now();

    let outcome = registry
        .update(&id, |t| (t.redeem_at(now), t.status_at(now)))?
        .ok_or_else(|| CliError::not_found(id.as_str()))?;

    match outcome {
        (true, _) => {
            tracing::info!(id = %id, "trip redeemed");
            show_after(registry, &id, settings)
        }
        (false, status) => {
            tracing::info!(id = %id, %status, "redemption refused");
            Err(CliError::Refused {
                id: id.to_string(),
                status: status.to_string(),
            })
        }
    }
}

pub fn deactivate(
    registry: &mut TicketRegistry,
    args: &TicketRef,
    settings: &Settings,
) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;

    let changed = registry
        .update(&id, |t| t.deactivate())?
        .ok_or_else(|| CliError::not_found(id.as_str()))??;

    if !changed {
        output::print_notice(&format!("Ticket {id} was already deactivated"), settings.quiet);
    }
    show_after(registry, &id, settings)
}

pub fn set_balance(
    registry: &mut TicketRegistry,
    args: &SetBalanceArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let id = util::parse_id(&args.id)?;

    registry
        .update(&id, |t| t.set_balance(args.trips))?
        .ok_or_else(|| CliError::not_found(id.as_str()))??;

    show_after(registry, &id, settings)
}

fn show_after(registry: &TicketRegistry, id: &TicketId, settings: &Settings) -> Result<(), CliError> {
    let ticket = util::find(registry, id)?;
    let now = Utc::now();
    let out = output::render_single(
        settings.output,
        ticket,
        |t| tickets::detail(t, now, settings.color),
        |t| t.status_at(now).to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use farepass_core::{LoadPolicy, Ticket};

    use super::*;
    use crate::cli::OutputFormat;

    fn settings() -> Settings {
        Settings {
            store_path: PathBuf::from("unused.json"),
            load_policy: LoadPolicy::Recover,
            output: OutputFormat::Plain,
            color: false,
            quiet: true,
            yes: true,
            validity_days: 30,
            trips: 10,
        }
    }

    fn registry_with(ticket: Ticket) -> (tempfile::TempDir, TicketRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = TicketRegistry::open(dir.path().join("tickets.json")).unwrap();
        registry.upsert(ticket).unwrap();
        (dir, registry)
    }

    fn id(raw: &str) -> TicketRef {
        TicketRef { id: raw.into() }
    }

    #[test]
    fn redeem_until_refused() {
        let ticket = Ticket::trip_limited(TicketId::new("T1").unwrap(), 1).unwrap();
        let (_dir, mut registry) = registry_with(ticket);

        redeem(&mut registry, &id("T1"), &settings()).unwrap();
        let err = redeem(&mut registry, &id("T1"), &settings()).unwrap_err();

        assert!(matches!(
            err,
            CliError::Refused { ref status, .. } if status == "exhausted"
        ));
        assert_eq!(registry.tickets()[0].history().len(), 1);
    }

    #[test]
    fn redeem_unknown_id_is_not_found() {
        let ticket = Ticket::unlimited(TicketId::new("U1").unwrap());
        let (_dir, mut registry) = registry_with(ticket);

        let err = redeem(&mut registry, &id("nope"), &settings()).unwrap_err();
        assert!(matches!(err, CliError::NotFound { .. }));
    }

    #[test]
    fn deactivate_twice_logs_once() {
        let ticket = Ticket::unlimited(TicketId::new("U1").unwrap());
        let (_dir, mut registry) = registry_with(ticket);

        deactivate(&mut registry, &id("U1"), &settings()).unwrap();
        deactivate(&mut registry, &id("U1"), &settings()).unwrap();

        assert_eq!(registry.tickets()[0].history().len(), 1);
    }

    #[test]
    fn deactivate_on_trip_pass_is_unsupported() {
        let ticket = Ticket::trip_limited(TicketId::new("T1").unwrap(), 3).unwrap();
        let (_dir, mut registry) = registry_with(ticket);

        let err = deactivate(&mut registry, &id("T1"), &settings()).unwrap_err();
        assert!(matches!(err, CliError::Unsupported { .. }));
    }

    #[test]
    fn set_balance_rejects_negative_and_keeps_value() {
        let ticket = Ticket::trip_limited(TicketId::new("T1").unwrap(), 3).unwrap();
        let (_dir, mut registry) = registry_with(ticket);
        let args = SetBalanceArgs {
            id: "T1".into(),
            trips: -1,
        };

        let err = set_balance(&mut registry, &args, &settings()).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
        assert_eq!(registry.tickets()[0].balance(), 3);
    }

    #[test]
    fn set_balance_is_persisted() {
        let ticket = Ticket::trip_limited(TicketId::new("T1").unwrap(), 3).unwrap();
        let (dir, mut registry) = registry_with(ticket);
        let args = SetBalanceArgs {
            id: "T1".into(),
            trips: 8,
        };

        set_balance(&mut registry, &args, &settings()).unwrap();

        let reopened = TicketRegistry::open(dir.path().join("tickets.json")).unwrap();
        assert_eq!(reopened.tickets()[0].balance(), 8);
    }
}
