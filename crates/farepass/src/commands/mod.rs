//! Command dispatch: bridges CLI args -> registry operations -> output formatting.

pub mod actions;
pub mod config_cmd;
pub mod issue;
pub mod tickets;
pub mod util;

use farepass_core::TicketRegistry;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    registry: &mut TicketRegistry,
    settings: &Settings,
) -> Result<(), CliError> {
    match cmd {
        Command::Issue(args) => issue::handle(registry, args, settings),
        Command::Redeem(args) => actions::redeem(registry, &args, settings),
        Command::Deactivate(args) => actions::deactivate(registry, &args, settings),
        Command::SetBalance(args) => actions::set_balance(registry, &args, settings),
        Command::Status(args) => tickets::status(registry, &args, settings),
        Command::Show(args) => tickets::show(registry, &args, settings),
        Command::History(args) => tickets::history(registry, &args, settings),
        Command::List(args) => tickets::list(registry, &args, settings),
        Command::Remove(args) => tickets::remove(registry, &args, settings),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
