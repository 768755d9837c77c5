//! CLI command implementations

pub mod add;
pub mod categories;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod delete;
pub mod list;
pub mod login;
pub mod logout;
pub mod logs;
pub mod register;
pub mod status;
pub mod summary;

use std::fmt::Display;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use dialoguer::{Input, Password};
use spendline_core::{LoggingService, SpendlineContext, YearMonth};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Record that a command ran, ignoring logging errors
pub fn log_command(logger: &Option<LoggingService>, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_command(command);
    }
}

/// Record a command outcome, ignoring logging errors
pub fn log_event(logger: &Option<LoggingService>, event: &str, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_event(event, command);
    }
}

/// Record a failed command, ignoring logging errors
pub fn log_failure(logger: &Option<LoggingService>, event: &str, command: &str, err: &dyn Display) {
    if let Some(l) = logger {
        let _ = l.log_error(event, command, &err.to_string());
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SPENDLINE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".spendline"))
}

/// Get or create spendline context
pub fn get_context() -> Result<SpendlineContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create spendline directory: {:?}", data_dir))?;

    SpendlineContext::new(&data_dir).context("Failed to initialize spendline context")
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `--month` / `--all` flags shared by the dashboard views
#[derive(Args, Debug, Clone, Default)]
pub struct MonthFilter {
    /// Month to show (YYYY-MM); defaults to the current month
    #[arg(long, conflicts_with = "all")]
    pub month: Option<String>,
    /// Show all time instead of a single month
    #[arg(long)]
    pub all: bool,
}

impl MonthFilter {
    pub fn resolve(&self, today: NaiveDate) -> Result<Option<YearMonth>> {
        if self.all {
            return Ok(None);
        }
        match &self.month {
            Some(month) => Ok(Some(month.parse()?)),
            None => Ok(Some(YearMonth::of(today))),
        }
    }
}

/// Heading for a filter, e.g. "Oct 2026" or "All time"
pub fn period_label(month: Option<YearMonth>) -> String {
    month.map(|m| m.label()).unwrap_or_else(|| "All time".to_string())
}

/// Use the flag value, or prompt when attached to a terminal
pub fn value_or_prompt(value: Option<String>, prompt: &str, flag: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("--{} is required when not running interactively", flag);
    }
    Ok(Input::new().with_prompt(prompt).interact_text()?)
}

/// Password from the flag, `SPENDLINE_PASSWORD`, or a hidden prompt
pub fn password_or_prompt(value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = value {
        return Ok(p);
    }
    if let Ok(p) = std::env::var("SPENDLINE_PASSWORD") {
        return Ok(p);
    }
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("--password is required when not running interactively");
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}
