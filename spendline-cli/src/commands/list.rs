//! List command - expenses for a month, newest first

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment};
use spendline_core::services::ExpenseList;

use super::{get_context, get_logger, log_command, period_label, today, MonthFilter};
use crate::output::{create_table, format_amount, format_date};

/// Characters of the id shown in the table; enough for `spend delete`
const SHORT_ID_LEN: usize = 8;

pub fn run(filter: MonthFilter, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "list");

    let ctx = get_context()?;
    let session = ctx.session()?;
    let month = filter.resolve(today())?;
    let list = ctx.dashboard_service.expense_list(&session, month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", format!("Expenses · {}", period_label(month)).bold());
    print_list(&list, &ctx.config.currency_symbol);
    Ok(())
}

/// Render the list table, or the empty state
pub fn print_list(list: &ExpenseList, symbol: &str) {
    if list.is_empty() {
        println!();
        println!("  {}", "No expenses found".bold());
        println!(
            "  {}",
            "Start tracking your expenses with `spend add`.".dimmed()
        );
        println!();
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["Date", "Category", "Description", "Amount", "Id"]);

    for expense in &list.items {
        let id = expense.id.to_string();
        table.add_row(vec![
            Cell::new(format_date(expense.date)),
            Cell::new(expense.category),
            Cell::new(&expense.description),
            Cell::new(format_amount(symbol, expense.amount)).set_alignment(CellAlignment::Right),
            Cell::new(&id[..SHORT_ID_LEN]),
        ]);
    }

    println!("{}", table);
}
