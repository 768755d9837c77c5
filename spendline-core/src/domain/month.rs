//! Calendar month used for filtering and trend series

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::result::Error;

/// A (year, month) pair identifying a calendar month
///
/// Both parts are plain integers, so comparing a month parsed from
/// user input against one taken from a date never depends on string
/// formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month (1 = January)
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// True if `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The month before this one
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Short label for charts, e.g. `Oct 2026`
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }
}

/// Days in the given month of the given year
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse `YYYY-MM` (the format of an HTML month input)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::validation(format!("Invalid month '{}'. Use YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let ym: YearMonth = "2026-03".parse().unwrap();
        assert_eq!(ym, YearMonth { year: 2026, month: 3 });

        // leading zero is optional once normalised to integers
        let ym: YearMonth = "2026-3".parse().unwrap();
        assert_eq!(ym.month, 3);

        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026".parse::<YearMonth>().is_err());
        assert!("abcd-01".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_pred_wraps_year() {
        let jan = YearMonth::new(2026, 1).unwrap();
        assert_eq!(jan.pred(), YearMonth::new(2025, 12).unwrap());
    }

    #[test]
    fn test_label_and_display() {
        let ym = YearMonth::new(2026, 10).unwrap();
        assert_eq!(ym.label(), "Oct 2026");
        assert_eq!(ym.to_string(), "2026-10");
    }

    #[test]
    fn test_contains() {
        let ym = YearMonth::new(2026, 2).unwrap();
        assert!(ym.contains(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
        assert!(!ym.contains(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
        assert!(!ym.contains(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
    }
}
