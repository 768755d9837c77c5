//! Dashboard command - summary, both charts and the expense list

use anyhow::Result;
use colored::Colorize;

use super::chart::{print_categories, print_trend};
use super::list::print_list;
use super::summary::print_summary;
use super::{get_context, get_logger, log_command, today, MonthFilter};

pub fn run(filter: MonthFilter, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "dashboard");

    let ctx = get_context()?;
    let session = ctx.session()?;
    let today = today();
    let month = filter.resolve(today)?;
    let dashboard = ctx.dashboard_service.build(&session, month, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    let symbol = &ctx.config.currency_symbol;
    if let Some(user) = session.user() {
        println!("{}\n", format!("Welcome, {}", user.name).bold());
    }

    print_summary(&dashboard.summary, symbol);
    println!();
    print_trend(&dashboard.trend, symbol);
    println!();
    print_categories(&dashboard.categories, symbol);
    println!();
    print_list(&dashboard.expenses, symbol);

    Ok(())
}
