//! Status command - who is logged in and where data lives

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use spendline_core::services::aggregate::sum_amounts;

use super::{get_context, get_data_dir, get_logger, log_command};
use crate::output::{self, create_table, format_amount};

#[derive(Serialize)]
struct StatusReport {
    logged_in: bool,
    name: Option<String>,
    email: Option<String>,
    expense_count: usize,
    total_spent: String,
    user_count: usize,
    storage: &'static str,
    data_dir: String,
}

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "status");

    let ctx = get_context()?;
    let session = ctx.session()?;
    let user = session.user();
    let total = sum_amounts(session.expenses())?;

    let report = StatusReport {
        logged_in: user.is_some(),
        name: user.map(|u| u.name.clone()),
        email: user.map(|u| u.email.clone()),
        expense_count: session.expenses().len(),
        total_spent: format_amount(&ctx.config.currency_symbol, total),
        user_count: ctx.auth_service.user_count()?,
        storage: ctx.repository.backend(),
        data_dir: get_data_dir()?.display().to_string(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Spendline Status".bold());
    println!();

    let mut table = create_table();
    match (&report.name, &report.email) {
        (Some(name), Some(email)) => {
            table.add_row(vec!["User", &format!("{} ({})", name, email)]);
            table.add_row(vec!["Expenses", &report.expense_count.to_string()]);
            table.add_row(vec!["Total spent", &report.total_spent]);
        }
        _ => {
            table.add_row(vec!["User", "Not logged in"]);
        }
    }
    table.add_row(vec!["Registered users", &report.user_count.to_string()]);
    table.add_row(vec!["Storage", report.storage]);
    table.add_row(vec!["Data directory", &report.data_dir]);

    println!("{}", table);

    if !report.logged_in {
        println!();
        output::info("Run `spend login` or `spend register` to get started.");
    }

    Ok(())
}
