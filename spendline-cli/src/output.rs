//! Output formatting utilities

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::{Decimal, RoundingStrategy};

/// Width of the longest chart bar, in cells
pub const BAR_WIDTH: usize = 32;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Amount with currency symbol, two decimal places
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", symbol, rounded)
}

/// Display date, e.g. "19 Oct 2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Horizontal bar scaled against `max`
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.clamp(1, BAR_WIDTH))
}

/// Paint text with a `#rrggbb` colour; unparseable colours leave it plain
pub fn paint(text: &str, hex: &str) -> ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    // byte slicing below needs single-byte chars
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_two_places() {
        assert_eq!(format_amount("₹", Decimal::new(1250, 2)), "₹12.50");
        assert_eq!(format_amount("$", Decimal::from(7)), "$7.00");
        assert_eq!(format_amount("₹", Decimal::new(96774, 3)), "₹96.77");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        assert_eq!(format_date(date), "9 Oct 2026");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0.0, 100.0), "");
        assert_eq!(bar(100.0, 100.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.01, 100.0).chars().count(), 1);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#6366f1"), Some((0x63, 0x66, 0xf1)));
        assert_eq!(parse_hex("6366f1"), None);
        assert_eq!(parse_hex("#xyz"), None);
    }

    #[test]
    fn test_parse_hex_multibyte_is_rejected() {
        // six bytes, three chars
        assert_eq!(parse_hex("#ééé"), None);
        assert_eq!(parse_hex("#a€bc"), None);
        assert_eq!(paint("bar", "#ééé").to_string(), "bar");
    }
}
