//! Chart command - trend and category charts drawn as bars

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use spendline_core::services::{CategoryChart, TrendChart};

use super::{get_context, get_logger, log_command, period_label, today, MonthFilter};
use crate::output::{bar, format_amount, paint};

#[derive(Subcommand)]
pub enum ChartCommands {
    /// Monthly totals for the trailing months
    Trend {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Spending per category
    Category {
        #[command(flatten)]
        filter: MonthFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ChartCommands) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "chart");

    let ctx = get_context()?;
    let session = ctx.session()?;
    let symbol = &ctx.config.currency_symbol;

    match command {
        ChartCommands::Trend { json } => {
            let chart = ctx.dashboard_service.trend_chart(&session, today())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                print_trend(&chart, symbol);
            }
        }
        ChartCommands::Category { filter, json } => {
            let month = filter.resolve(today())?;
            let chart = ctx.dashboard_service.category_chart(&session, month)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                print_categories(&chart, symbol);
            }
        }
    }

    Ok(())
}

pub fn print_trend(chart: &TrendChart, symbol: &str) {
    println!("{}", chart.title.bold());

    let max = chart
        .points
        .iter()
        .filter_map(|p| p.total.to_f64())
        .fold(0.0, f64::max);
    for point in &chart.points {
        let value = point.total.to_f64().unwrap_or(0.0);
        println!(
            "  {:<8} {:>12}  {}",
            point.label,
            format_amount(symbol, point.total),
            bar(value, max).cyan()
        );
    }
}

pub fn print_categories(chart: &CategoryChart, symbol: &str) {
    println!(
        "{}",
        format!("Expenses by Category · {}", period_label(chart.month)).bold()
    );

    if chart.segments.is_empty() {
        println!("  {}", "No expenses found".dimmed());
        return;
    }

    let max = chart
        .segments
        .iter()
        .filter_map(|s| s.total.to_f64())
        .fold(0.0, f64::max);

    for segment in &chart.segments {
        let value = segment.total.to_f64().unwrap_or(0.0);
        println!(
            "  {:<14} {:>12} {:>6}%  {}",
            segment.category.as_str(),
            format_amount(symbol, segment.total),
            segment.percentage.round_dp(1).to_string(),
            paint(&bar(value, max), segment.color)
        );
    }
}
