//! Dashboard service - summary cards, chart data and the expense list
//!
//! Every call rebuilds its output from the session's expenses; nothing is
//! cached between refreshes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Category, Expense, YearMonth};

use super::aggregate::{
    average_daily, category_shares, category_totals, filter_by_month, monthly_series,
    sort_for_list, sum_amounts,
};
use super::Session;

/// Segment colours for the category chart, cycled when exhausted
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#6366f1", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#3b82f6", "#ef4444", "#14b8a6",
];

/// Summary cards
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Filter in effect, `None` for all time
    pub month: Option<YearMonth>,
    /// Total of the filtered expenses
    pub total: Decimal,
    /// Total of the current calendar month, whatever the filter
    pub this_month_total: Decimal,
    /// `this_month_total` spread over the days of the current month
    pub average_daily: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub month: YearMonth,
    pub total: Decimal,
}

/// Trailing-months line chart
#[derive(Debug, Clone, Serialize)]
pub struct TrendChart {
    pub title: String,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySegment {
    pub category: Category,
    pub total: Decimal,
    pub percentage: Decimal,
    pub color: &'static str,
}

/// Category breakdown for the filtered month
#[derive(Debug, Clone, Serialize)]
pub struct CategoryChart {
    pub month: Option<YearMonth>,
    pub total: Decimal,
    pub segments: Vec<CategorySegment>,
}

/// Filtered expenses, newest first
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseList {
    pub month: Option<YearMonth>,
    pub items: Vec<Expense>,
}

impl ExpenseList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Everything shown on one dashboard refresh
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub trend: TrendChart,
    pub categories: CategoryChart,
    pub expenses: ExpenseList,
}

/// Builds dashboard views from a session
pub struct DashboardService {
    trend_months: usize,
}

impl DashboardService {
    pub fn new(trend_months: usize) -> Self {
        Self { trend_months }
    }

    pub fn summary(&self, session: &Session, month: Option<YearMonth>, today: NaiveDate) -> Result<Summary> {
        session.require_user()?;
        let expenses = session.expenses();

        let filtered = filter_by_month(expenses, month);
        let current = YearMonth::of(today);
        let this_month = filter_by_month(expenses, Some(current));
        let this_month_total = sum_amounts(&this_month)?;

        Ok(Summary {
            month,
            total: sum_amounts(&filtered)?,
            this_month_total,
            average_daily: average_daily(this_month_total, current.year, current.month),
            transaction_count: filtered.len(),
        })
    }

    /// Trend over all expenses, independent of the month filter
    pub fn trend_chart(&self, session: &Session, today: NaiveDate) -> Result<TrendChart> {
        session.require_user()?;
        let points = monthly_series(session.expenses(), today, self.trend_months)?
            .into_iter()
            .map(|m| TrendPoint {
                label: m.label,
                month: m.month,
                total: m.total,
            })
            .collect();

        Ok(TrendChart {
            title: "Monthly Expenses".to_string(),
            points,
        })
    }

    pub fn category_chart(&self, session: &Session, month: Option<YearMonth>) -> Result<CategoryChart> {
        session.require_user()?;
        let filtered = filter_by_month(session.expenses(), month);
        let totals = category_totals(&filtered)?;
        let shares = category_shares(&totals)?;

        let segments = totals
            .into_iter()
            .zip(shares)
            .enumerate()
            .map(|(i, ((category, total), (_, percentage)))| CategorySegment {
                category,
                total,
                percentage,
                color: CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()],
            })
            .collect();

        Ok(CategoryChart {
            month,
            total: sum_amounts(&filtered)?,
            segments,
        })
    }

    pub fn expense_list(&self, session: &Session, month: Option<YearMonth>) -> Result<ExpenseList> {
        session.require_user()?;
        let mut items = filter_by_month(session.expenses(), month);
        sort_for_list(&mut items);
        Ok(ExpenseList { month, items })
    }

    /// Full refresh: summary, both charts and the list
    pub fn build(&self, session: &Session, month: Option<YearMonth>, today: NaiveDate) -> Result<Dashboard> {
        Ok(Dashboard {
            summary: self.summary(session, month, today)?,
            trend: self.trend_chart(session, today)?,
            categories: self.category_chart(session, month)?,
            expenses: self.expense_list(session, month)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session_with(expenses: Vec<Expense>) -> Session {
        Session::start(User::new("A", "a@example.com", "hash"), expenses)
    }

    fn exp(amount: i64, category: Category, on: NaiveDate) -> Expense {
        Expense::new(Decimal::from(amount), category, on, None)
    }

    #[test]
    fn test_summary_this_month_ignores_filter() {
        let today = date(2026, 10, 19);
        let session = session_with(vec![
            exp(10, Category::Food, date(2026, 10, 1)),
            exp(20, Category::Transport, date(2026, 10, 2)),
            exp(70, Category::Food, date(2026, 10, 3)),
            exp(500, Category::Shopping, date(2026, 9, 3)),
        ]);
        let service = DashboardService::new(6);

        let sep = YearMonth::new(2026, 9);
        let summary = service.summary(&session, sep, today).unwrap();
        assert_eq!(summary.total, Decimal::from(500));
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.this_month_total, Decimal::from(100));
        assert_eq!(summary.average_daily, Decimal::from(100) / Decimal::from(31));

        let all = service.summary(&session, None, today).unwrap();
        assert_eq!(all.total, Decimal::from(600));
        assert_eq!(all.transaction_count, 4);
    }

    #[test]
    fn test_empty_dashboard_is_all_zero() {
        let session = session_with(Vec::new());
        let service = DashboardService::new(6);
        let dashboard = service.build(&session, None, date(2026, 2, 1)).unwrap();

        assert_eq!(dashboard.summary.total, Decimal::ZERO);
        assert_eq!(dashboard.summary.average_daily, Decimal::ZERO);
        assert_eq!(dashboard.summary.transaction_count, 0);
        assert_eq!(dashboard.trend.points.len(), 6);
        assert!(dashboard.trend.points.iter().all(|p| p.total.is_zero()));
        assert!(dashboard.categories.segments.is_empty());
        assert!(dashboard.expenses.is_empty());
    }

    #[test]
    fn test_category_chart_colours_and_shares() {
        let on = date(2026, 10, 5);
        let session = session_with(vec![
            exp(150, Category::Food, on),
            exp(50, Category::Transport, on),
        ]);
        let chart = DashboardService::new(6).category_chart(&session, None).unwrap();

        assert_eq!(chart.total, Decimal::from(200));
        assert_eq!(chart.segments[0].color, "#6366f1");
        assert_eq!(chart.segments[1].color, "#8b5cf6");
        assert_eq!(chart.segments[0].percentage, Decimal::from(75));
    }

    #[test]
    fn test_trend_totals_keep_exact_cents() {
        let today = date(2026, 10, 19);
        let session = session_with(vec![
            Expense::new(Decimal::new(10, 2), Category::Food, today, None),
            Expense::new(Decimal::new(20, 2), Category::Food, today, None),
        ]);
        let chart = DashboardService::new(6).trend_chart(&session, today).unwrap();

        let last = chart.points.last().unwrap();
        assert_eq!(last.total, Decimal::new(30, 2));
    }

    #[test]
    fn test_expense_list_sorted_newest_first() {
        let session = session_with(vec![
            exp(1, Category::Food, date(2026, 10, 1)),
            exp(2, Category::Food, date(2026, 10, 9)),
            exp(3, Category::Food, date(2026, 9, 30)),
        ]);
        let list = DashboardService::new(6)
            .expense_list(&session, YearMonth::new(2026, 10))
            .unwrap();

        let amounts: Vec<_> = list.items.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Decimal::from(2), Decimal::from(1)]);
    }

    #[test]
    fn test_requires_login() {
        let service = DashboardService::new(6);
        assert!(service.build(&Session::anonymous(), None, date(2026, 1, 1)).is_err());
    }

    #[test]
    fn test_oversized_totals_error_instead_of_panic() {
        let today = date(2026, 10, 19);
        let session = session_with(vec![
            Expense::new(Decimal::MAX, Category::Food, today, None),
            Expense::new(Decimal::MAX, Category::Food, today, None),
        ]);
        let service = DashboardService::new(6);

        assert!(service.summary(&session, None, today).is_err());
        assert!(service.trend_chart(&session, today).is_err());
        assert!(service.category_chart(&session, None).is_err());
        assert!(service.build(&session, None, today).is_err());
    }
}
