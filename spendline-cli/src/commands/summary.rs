//! Summary command - totals for a month

use anyhow::Result;
use colored::Colorize;
use spendline_core::services::Summary;

use super::{get_context, get_logger, log_command, period_label, today, MonthFilter};
use crate::output::{create_table, format_amount};

pub fn run(filter: MonthFilter, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "summary");

    let ctx = get_context()?;
    let session = ctx.session()?;
    let month = filter.resolve(today())?;
    let summary = ctx.dashboard_service.summary(&session, month, today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_summary(&summary, &ctx.config.currency_symbol);
    Ok(())
}

pub fn print_summary(summary: &Summary, symbol: &str) {
    println!("{}", format!("Summary · {}", period_label(summary.month)).bold());

    let mut table = create_table();
    table.add_row(vec!["Total expenses", &format_amount(symbol, summary.total)]);
    table.add_row(vec![
        "This month",
        &format_amount(symbol, summary.this_month_total),
    ]);
    table.add_row(vec![
        "Average daily",
        &format_amount(symbol, summary.average_daily),
    ]);
    table.add_row(vec!["Transactions", &summary.transaction_count.to_string()]);

    println!("{}", table);
}
