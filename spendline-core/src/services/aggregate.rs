//! Aggregation over expense lists
//!
//! Pure functions with no I/O. Everything that needs "today" takes it as
//! an argument so results are reproducible.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Category, Expense, YearMonth};

/// Default number of trailing months in the trend series
pub const DEFAULT_TREND_MONTHS: usize = 6;

/// Expenses falling in `month`, or all of them when no month is given
///
/// Input order is kept.
pub fn filter_by_month(expenses: &[Expense], month: Option<YearMonth>) -> Vec<Expense> {
    match month {
        Some(ym) => expenses
            .iter()
            .filter(|e| ym.contains(e.date))
            .cloned()
            .collect(),
        None => expenses.to_vec(),
    }
}

/// Checked sum; stored amounts are not trusted to stay in range
fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| Error::Other("Expense total is too large to compute".to_string()))
    })
}

/// Sum of amounts, zero for an empty list
///
/// Fails instead of overflowing.
pub fn sum_amounts(expenses: &[Expense]) -> Result<Decimal> {
    checked_total(expenses.iter().map(|e| e.amount))
}

/// One point of the trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: YearMonth,
    pub label: String,
    pub total: Decimal,
}

/// Totals for the `month_count` months ending at `today`'s month, oldest first
///
/// Months without expenses are present with a zero total.
pub fn monthly_series(
    expenses: &[Expense],
    today: NaiveDate,
    month_count: usize,
) -> Result<Vec<MonthTotal>> {
    let mut months = Vec::with_capacity(month_count);
    let mut month = YearMonth::of(today);
    for _ in 0..month_count {
        months.push(month);
        month = month.pred();
    }
    months.reverse();

    months
        .into_iter()
        .map(|month| {
            let total = checked_total(
                expenses
                    .iter()
                    .filter(|e| month.contains(e.date))
                    .map(|e| e.amount),
            )?;
            Ok(MonthTotal {
                month,
                label: month.label(),
                total,
            })
        })
        .collect()
}

/// Per-category totals for the categories present, in first-seen order
pub fn category_totals(expenses: &[Expense]) -> Result<Vec<(Category, Decimal)>> {
    let mut totals: Vec<(Category, Decimal)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, total)) => *total = checked_total([*total, expense.amount])?,
            None => totals.push((expense.category, expense.amount)),
        }
    }
    Ok(totals)
}

/// Percentage of `grand_total` that `value` represents
///
/// A zero grand total yields 0 rather than a division error.
pub fn percentage(value: Decimal, grand_total: Decimal) -> Decimal {
    if grand_total.is_zero() {
        Decimal::ZERO
    } else {
        value / grand_total * Decimal::ONE_HUNDRED
    }
}

/// Each category's share of the grand total, in the same order
pub fn category_shares(totals: &[(Category, Decimal)]) -> Result<Vec<(Category, Decimal)>> {
    let grand_total = checked_total(totals.iter().map(|(_, t)| *t))?;
    Ok(totals
        .iter()
        .map(|(c, t)| (*c, percentage(*t, grand_total)))
        .collect())
}

/// Average spend per day over the given month
///
/// Divides by the real length of that month, so February of a leap
/// year counts 29 days.
pub fn average_daily(current_month_total: Decimal, year: i32, month: u32) -> Decimal {
    let days = crate::domain::month::days_in_month(year, month);
    if days == 0 {
        return Decimal::ZERO;
    }
    current_month_total / Decimal::from(days)
}

/// Newest first; expenses on the same date keep their insertion order
pub fn sort_for_list(expenses: &mut [Expense]) {
    // sort_by is stable
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}
