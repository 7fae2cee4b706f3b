//! Display formatting for amounts and dates (en-US conventions).

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Format `amount` as en-US currency with two decimals, e.g. `$1,999.00`.
///
/// Well-known ISO codes get their symbol; any other code is used as a prefix
/// followed by a space (`CHF 12.50`).
///
/// Amounts are exact up to [`MAX_AMOUNT`](crate::entity::MAX_AMOUNT), the
/// bound `Reminder::validate` enforces. Beyond about 1.8e17 the cent count
/// saturates, and non-finite input formats as zero.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents != 0 { "-" } else { "" };

    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}.{:02}", sign, symbol, whole, fraction),
        None => format!("{}{} {}.{:02}", sign, currency, whole, fraction),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        _ => None,
    }
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();
    groups.join(",")
}

/// Human-readable date, e.g. `Mar 15, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parse an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `Error::ValidationError` if `s` is not a valid calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::ValidationError(format!("invalid date {:?}: {}", s, e)))
}

/// Absolute number of whole days between `date` and `today`.
pub fn days_between(date: NaiveDate, today: NaiveDate) -> u64 {
    (today - date).num_days().unsigned_abs()
}

/// Relative label: `Today`, `Yesterday`, or `{n} days ago`.
pub fn format_days_ago(date: NaiveDate, today: NaiveDate) -> String {
    match days_between(date, today) {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n => format!("{} days ago", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_format_currency_usd() {
        assert_eq!(format_currency(1999.0, "USD"), "$1,999.00");
        assert_eq!(format_currency(0.0, "USD"), "$0.00");
        assert_eq!(format_currency(12.5, "USD"), "$12.50");
        assert_eq!(format_currency(1_234_567.891, "USD"), "$1,234,567.89");
        assert_eq!(format_currency(1000.0, "USD"), "$1,000.00");
    }

    #[test]
    fn test_format_currency_rounds_half_cents() {
        assert_eq!(format_currency(0.999, "USD"), "$1.00");
        assert_eq!(format_currency(19.999, "USD"), "$20.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-42.1, "USD"), "-$42.10");
        assert_eq!(format_currency(-0.001, "USD"), "$0.00");
    }

    #[test]
    fn test_format_currency_at_max_amount() {
        assert_eq!(
            format_currency(crate::entity::MAX_AMOUNT, "USD"),
            "$1,000,000,000,000,000.00"
        );
        assert_eq!(format_currency(f64::NAN, "USD"), "$0.00");
    }

    #[test]
    fn test_format_currency_other_codes() {
        assert_eq!(format_currency(2500.0, "EUR"), "€2,500.00");
        assert_eq!(format_currency(12.5, "CHF"), "CHF 12.50");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date("2024-03-15")), "Mar 15, 2024");
        assert_eq!(format_date(date("2024-12-01")), "Dec 1, 2024");
    }

    #[test]
    fn test_days_ago() {
        let due = date("2024-03-15");
        assert_eq!(format_days_ago(due, date("2024-03-15")), "Today");
        assert_eq!(format_days_ago(due, date("2024-03-16")), "Yesterday");
        assert_eq!(format_days_ago(due, date("2024-03-25")), "10 days ago");
    }

    #[test]
    fn test_days_between_is_absolute() {
        let a = date("2024-02-28");
        let b = date("2024-03-01");
        assert_eq!(days_between(a, b), 2);
        assert_eq!(days_between(b, a), 2);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
