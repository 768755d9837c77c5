//! Spendline CLI - Personal expense tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{
    add, categories, chart, config, dashboard, delete, list, login, logout, logs, register,
    status, summary, MonthFilter,
};

/// Spendline - track personal expenses from the terminal
#[derive(Parser)]
#[command(name = "spend", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Email address (must be unique)
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted if omitted; SPENDLINE_PASSWORD also works)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in to an existing account
    Login {
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted if omitted; SPENDLINE_PASSWORD also works)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out of the current session
    Logout,

    /// Show session and storage status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a new expense
    Add {
        /// Amount, e.g. 12.50
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// Category (see `spend categories`)
        #[arg(long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an expense by id (or unique id prefix)
    Delete {
        /// Expense id as shown by `spend list`
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List expenses, newest first
    List {
        #[command(flatten)]
        filter: MonthFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show summary totals
    Summary {
        #[command(flatten)]
        filter: MonthFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw trend or category charts
    Chart {
        #[command(subcommand)]
        command: chart::ChartCommands,
    },

    /// Summary, charts and expense list in one view
    Dashboard {
        #[command(flatten)]
        filter: MonthFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List expense categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Input mistakes get the bare message, everything else the full chain
            let message = match e.downcast_ref::<spendline_core::Error>() {
                Some(core) if core.is_user_facing() => core.to_string(),
                _ => format!("{:#}", e),
            };
            output::error(&message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { name, email, password, json } => {
            register::run(name, email, password, json)
        }
        Commands::Login { email, password, json } => login::run(email, password, json),
        Commands::Logout => logout::run(),
        Commands::Status { json } => status::run(json),
        Commands::Add { amount, category, date, description, json } => add::run(add::AddArgs {
            amount,
            category,
            date,
            description,
            json,
        }),
        Commands::Delete { id, force, json } => delete::run(&id, force, json),
        Commands::List { filter, json } => list::run(filter, json),
        Commands::Summary { filter, json } => summary::run(filter, json),
        Commands::Chart { command } => chart::run(command),
        Commands::Dashboard { filter, json } => dashboard::run(filter, json),
        Commands::Categories { json } => categories::run(json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
