//! Command-line front end over the record store.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::ConfigError;
use crate::core::errors::FinanceError;
use crate::core::filters::DateRange;
use crate::domain::EntryKind;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Input(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "fintrack_cli", version)]
#[command(about = "Track income, expenses, recurring bills and budgets")]
pub struct Cli {
    /// Data directory holding `data.json` and `config/` (also read from `FINTRACK_HOME`).
    #[arg(long, global = true, env = "FINTRACK_HOME")]
    pub data_dir: Option<PathBuf>,

    /// Email of the user to act as (also read from `FINTRACK_USER`).
    #[arg(long, short, global = true, env = "FINTRACK_USER")]
    pub user: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a user account with the default categories.
    Register(RegisterArgs),
    /// Record a transaction and report its budget status.
    Add(AddArgs),
    /// Manage monthly recurring transactions.
    Recurring {
        #[command(subcommand)]
        command: RecurringCommand,
    },
    /// Manage categories and their budgets.
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Show totals, breakdowns and recent activity.
    Dashboard(DashboardArgs),
    /// Show spend against every category budget.
    Budget,
    /// Create, list or restore ledger backups.
    Backup {
        #[command(subcommand)]
        command: Option<BackupCommand>,
    },
    /// Print build information.
    Version,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    /// Opaque password hash produced by the caller.
    #[arg(long)]
    pub password_hash: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub amount: f64,
    #[arg(long)]
    pub description: String,
    #[arg(long = "type", default_value = "expense")]
    pub kind: EntryKind,
    /// Category name (case-insensitive).
    #[arg(long)]
    pub category: String,
    /// Transaction date as YYYY-MM-DD; defaults to now.
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum RecurringCommand {
    Add(RecurringAddArgs),
    List,
    /// Show templates that would be generated today, without generating them.
    Due,
    /// Materialize every template that is due today.
    Process,
}

#[derive(Args, Debug)]
pub struct RecurringAddArgs {
    #[arg(long)]
    pub amount: f64,
    #[arg(long)]
    pub description: String,
    #[arg(long = "type", default_value = "expense")]
    pub kind: EntryKind,
    #[arg(long)]
    pub category: String,
    /// Day of month (1-31) on which the transaction is generated.
    #[arg(long)]
    pub day: u32,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Add(CategoryAddArgs),
    List,
}

#[derive(Args, Debug)]
pub struct CategoryAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type", default_value = "expense")]
    pub kind: EntryKind,
    #[arg(long)]
    pub budget: Option<f64>,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Match description, amount or category name.
    #[arg(long)]
    pub query: Option<String>,
    /// all, today, week, month or year.
    #[arg(long, default_value = "all")]
    pub range: DateRange,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    Create {
        #[arg(long)]
        note: Option<String>,
    },
    List,
    Restore { name: String },
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> CliResult<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> CliResult<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    commands::dispatch(cli)
}
