//! Clap derive structures for the `farepass` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man page generation, so this file may
//! only depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// farepass -- issue, redeem, and manage fare tickets
#[derive(Debug, Parser)]
#[command(
    name = "farepass",
    version,
    about = "Issue, redeem, and manage fare tickets",
    long_about = "Keeps a local registry of fare tickets: unlimited passes,\n\
        time-limited passes, and trip-limited passes. Every change is written\n\
        to the ticket store before the command returns.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Ticket store file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "FAREPASS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Fail instead of starting empty when the ticket store is unreadable
    #[arg(long, global = true)]
    pub strict: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue a new ticket (replaces any ticket with the same id)
    #[command(alias = "new")]
    Issue(IssueArgs),

    /// Redeem one trip from a ticket
    #[command(alias = "r")]
    Redeem(TicketRef),

    /// Permanently deactivate an unlimited pass
    Deactivate(TicketRef),

    /// Overwrite the remaining trips of a trip-limited pass
    SetBalance(SetBalanceArgs),

    /// Show whether a ticket can currently be redeemed
    Status(TicketRef),

    /// Show ticket details
    #[command(alias = "get")]
    Show(TicketRef),

    /// Show a ticket's activity log
    #[command(alias = "log")]
    History(TicketRef),

    /// List all tickets
    #[command(alias = "ls")]
    List(ListArgs),

    /// Remove a ticket from the store
    #[command(alias = "rm")]
    Remove(TicketRef),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// A single ticket, addressed by id.
#[derive(Debug, Args)]
pub struct TicketRef {
    /// Ticket id
    pub id: String,
}

// ── Issue ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IssueArgs {
    #[command(subcommand)]
    pub command: IssueCommand,
}

#[derive(Debug, Subcommand)]
pub enum IssueCommand {
    /// Pass valid until deactivated
    Unlimited {
        /// Ticket id
        id: String,
    },

    /// Pass valid for a number of days from now
    #[command(alias = "timed")]
    TimeLimited {
        /// Ticket id
        id: String,

        /// Validity period in whole days [default: from config]
        #[arg(long, short = 'd', allow_negative_numbers = true)]
        days: Option<i64>,
    },

    /// Pass holding a fixed number of trips
    #[command(alias = "trip-limited")]
    Trips {
        /// Ticket id
        id: String,

        /// Number of trips [default: from config]
        #[arg(long, short = 'n', allow_negative_numbers = true)]
        trips: Option<i64>,
    },
}

// ── Set balance ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetBalanceArgs {
    /// Ticket id
    pub id: String,

    /// New number of remaining trips
    #[arg(allow_negative_numbers = true)]
    pub trips: i64,
}

// ── List ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show tickets in this state
    #[arg(long, short = 's')]
    pub status: Option<StatusFilter>,

    /// Only show tickets of this kind
    #[arg(long, short = 'k')]
    pub kind: Option<KindFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Active,
    Deactivated,
    Expired,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Unlimited,
    TimeLimited,
    TripLimited,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file and ticket store locations
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
