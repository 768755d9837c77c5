//! Add command - record a new expense

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Input, Select};
use rust_decimal::Decimal;
use spendline_core::{Category, NewExpense, OperationResult};

use super::{get_context, get_logger, log_command, log_event, log_failure, today, value_or_prompt};
use crate::output::{format_amount, format_date};

pub struct AddArgs {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub json: bool,
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| anyhow::anyhow!("Invalid amount '{}'", raw.trim()))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD"))
}

fn category_or_prompt(value: Option<String>) -> Result<Category> {
    if let Some(v) = value {
        return Ok(v.parse()?);
    }
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("--category is required when not running interactively");
    }

    let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
    let index = Select::new()
        .with_prompt("Category")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(Category::ALL[index])
}

fn description_or_prompt(value: Option<String>) -> Result<Option<String>> {
    if value.is_some() || atty::isnt(atty::Stream::Stdin) {
        return Ok(value);
    }
    let entered: String = Input::new()
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(entered))
}

pub fn run(args: AddArgs) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "add");

    let ctx = get_context()?;
    let mut session = ctx.session()?;
    session.require_user()?;

    let amount = parse_amount(&value_or_prompt(args.amount, "Amount", "amount")?)?;
    let category = category_or_prompt(args.category)?;
    let date = match args.date {
        Some(d) => parse_date(&d)?,
        None => today(),
    };
    let description = description_or_prompt(args.description)?;

    let new = NewExpense {
        amount,
        category,
        date,
        description,
    };

    let expense = ctx
        .expense_service
        .add(&mut session, new)
        .inspect_err(|e| {
            log_failure(&logger, "expense_add_failed", "add", e);
        })
        .context("Failed to add expense")?;

    log_event(&logger, "expense_added", "add");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&expense))?);
        return Ok(());
    }

    println!("\n{} Expense added successfully!", "✓".green());
    println!(
        "  {} · {} · {} · {}",
        format_amount(&ctx.config.currency_symbol, expense.amount).bold(),
        expense.category,
        format_date(expense.date),
        expense.description
    );
    println!("  {}\n", format!("id {}", expense.id).dimmed());

    Ok(())
}
