//! Command-line front end over the tenant manager and services.

pub mod handlers;
pub mod output;

use clap::{Parser, Subcommand};

use crate::core::errors::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "rental_core_cli",
    about = "Back office for event-equipment rental: ledger and recurring obligations."
)]
pub struct Cli {
    /// Tenant to work on (default: the configured default tenant)
    #[arg(long, global = true)]
    pub tenant: Option<String>,
    /// Operator name recorded in the session
    #[arg(long, global = true)]
    pub operator: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage tenants.
    Tenant {
        #[command(subcommand)]
        command: TenantCommands,
    },
    /// Manage recurring obligations.
    Obligation {
        #[command(subcommand)]
        command: ObligationCommands,
    },
    /// Inspect and settle ledger movements.
    Movement {
        #[command(subcommand)]
        command: MovementCommands,
    },
    /// Materialize pending recurring movements.
    Generate {
        /// Cutoff date YYYY-MM-DD (default: today)
        #[arg(long)]
        through: Option<String>,
        /// Only show what would be created
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Income and expense totals for a date range.
    Summary {
        /// First day YYYY-MM-DD (default: first day of the current month)
        #[arg(long)]
        from: Option<String>,
        /// Last day YYYY-MM-DD (default: last day of the current month)
        #[arg(long)]
        to: Option<String>,
    },
    /// Back up the tenant file.
    Backup {
        /// Short label appended to the backup name
        #[arg(long)]
        note: Option<String>,
    },
    /// Print build information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum TenantCommands {
    /// Create a new tenant.
    New {
        name: String,
        /// Make it the default tenant
        #[arg(long)]
        default: bool,
    },
    /// List stored tenants.
    List,
}

#[derive(Subcommand, Debug)]
pub enum ObligationCommands {
    /// Add a recurring expense or income.
    Add {
        /// Free-text description, e.g. 'Warehouse rent'
        description: String,
        /// Amount per occurrence
        #[arg(long)]
        amount: f64,
        /// expense or income
        #[arg(long, default_value = "expense")]
        kind: String,
        /// weekly, biweekly, monthly, bimonthly, quarterly, yearly
        #[arg(long, default_value = "monthly")]
        frequency: String,
        /// Day of month, clamped to 1..=28
        #[arg(long = "day", default_value = "1")]
        billing_day: i64,
        /// First date YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Last date YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List obligations with their next due date.
    List {
        /// Reference date YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// Resume generation for an obligation.
    Activate {
        /// Obligation id or unique prefix
        id: String,
    },
    /// Pause generation for an obligation.
    Deactivate {
        /// Obligation id or unique prefix
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MovementCommands {
    /// List movements, optionally within a date range.
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Mark a movement as paid.
    Pay {
        /// Movement id or unique prefix
        id: String,
        /// Payment date YYYY-MM-DD (default: today)
        #[arg(long)]
        on: Option<String>,
    },
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    handlers::execute(Cli::parse())
}
