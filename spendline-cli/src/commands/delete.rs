//! Delete command - remove one expense by id

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use serde_json::json;

use super::{get_context, get_logger, log_command, log_event};
use crate::output::{self, format_amount, format_date};

pub fn run(id: &str, force: bool, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "delete");

    let ctx = get_context()?;
    let mut session = ctx.session()?;

    // Unknown ids are a no-op, not an error
    let Some(expense_id) = ctx.expense_service.resolve_id(&session, id)? else {
        if json {
            println!("{}", json!({"deleted": false}));
        } else {
            output::warning(&format!("No expense with id '{}'", id));
        }
        return Ok(());
    };

    if !force && !json {
        if let Some(expense) = session.expenses().iter().find(|e| e.id == expense_id) {
            println!(
                "\n{}",
                format!(
                    "{} · {} · {} · {}",
                    format_amount(&ctx.config.currency_symbol, expense.amount),
                    expense.category,
                    format_date(expense.date),
                    expense.description
                )
                .yellow()
            );
        }

        if atty::isnt(atty::Stream::Stdin) {
            anyhow::bail!("Refusing to delete without confirmation; pass --force");
        }
        if !Confirm::new()
            .with_prompt("Are you sure you want to delete this expense?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let deleted = ctx.expense_service.delete(&mut session, expense_id)?;
    if deleted {
        log_event(&logger, "expense_deleted", "delete");
    }

    if json {
        println!("{}", json!({"deleted": deleted, "id": expense_id}));
    } else if deleted {
        println!("\n{} Expense deleted successfully!\n", "✓".green());
    }

    Ok(())
}
