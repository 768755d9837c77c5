//! Expense domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::Error;

/// Description stored when the user leaves it blank
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Largest amount accepted for a single expense (one billion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Fixed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Shopping,
    Healthcare,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Shopping,
        Category::Healthcare,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
                Error::validation(format!(
                    "Unknown category '{}'. Expected one of: {}",
                    wanted,
                    names.join(", ")
                ))
            })
    }
}

/// A single expense owned by one user
///
/// The owner is not stored on the record; it is implied by which
/// user's list the expense lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense, filling in the default description when blank
    pub fn new(
        amount: Decimal,
        category: Category,
        date: NaiveDate,
        description: Option<&str>,
    ) -> Self {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string();

        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            date,
            description,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_defaults() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let e = Expense::new(Decimal::new(1000, 2), Category::Food, date, Some("   "));
        assert_eq!(e.description, DEFAULT_DESCRIPTION);

        let e = Expense::new(Decimal::new(1000, 2), Category::Food, date, None);
        assert_eq!(e.description, DEFAULT_DESCRIPTION);

        let e = Expense::new(Decimal::new(1000, 2), Category::Food, date, Some(" lunch "));
        assert_eq!(e.description, "lunch");
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" TRANSPORT ".parse::<Category>().unwrap(), Category::Transport);
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_expense_json_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        let e = Expense::new(Decimal::new(4550, 2), Category::Utilities, date, Some("power"));
        let json = serde_json::to_value(&e).unwrap();

        assert_eq!(json["category"], "Utilities");
        assert_eq!(json["date"], "2026-10-05");
        assert!(json.get("createdAt").is_some());
    }
}
