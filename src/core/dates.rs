//! Date arithmetic for statement parsing and NBP rate lookups.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::cmp::Ordering;

/// Parses a statement date in the "15 Jan 2024" form.
pub fn parse_statement_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d %b %Y")
        .with_context(|| format!("Invalid statement date: '{text}'"))
}

/// Renders a date as the ISO "YYYY-MM-DD" key used for NBP queries and caching.
pub fn format_lookup_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the closest business day strictly before `date`.
///
/// Only weekends are skipped; NBP holiday gaps are handled by the fetch
/// fallback loop instead.
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    let mut day = date - Duration::days(1);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day -= Duration::days(1);
    }
    day
}

/// Chronological ordering over raw statement date strings.
///
/// Unparseable dates compare equal so a malformed row never aborts a sort;
/// the sort is stable, so such rows keep their original position.
pub fn compare_statement_dates(a: &str, b: &str) -> Ordering {
    match (parse_statement_date(a), parse_statement_date(b)) {
        (Ok(da), Ok(db)) => da.cmp(&db),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_statement_date() {
        assert_eq!(parse_statement_date("15 Jan 2024").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_statement_date("1 Dec 2023").unwrap(), date(2023, 12, 1));
        assert_eq!(parse_statement_date(" 29 Feb 2024 ").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_parse_statement_date_bad_month() {
        assert!(parse_statement_date("15 Janvier 2024").is_err());
        assert!(parse_statement_date("15 Foo 2024").is_err());
    }

    #[test]
    fn test_parse_statement_date_malformed_day_or_year() {
        assert!(parse_statement_date("32 Jan 2024").is_err());
        assert!(parse_statement_date("0 Jan 2024").is_err());
        assert!(parse_statement_date("29 Feb 2023").is_err());
        assert!(parse_statement_date("15 Jan twenty24").is_err());
        assert!(parse_statement_date("2024-01-15").is_err());
        assert!(parse_statement_date("").is_err());
    }

    #[test]
    fn test_format_lookup_key() {
        assert_eq!(format_lookup_key(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(format_lookup_key(date(2023, 12, 31)), "2023-12-31");
    }

    #[test]
    fn test_previous_business_day_midweek() {
        // Thursday -> Wednesday
        assert_eq!(previous_business_day(date(2024, 1, 11)), date(2024, 1, 10));
    }

    #[test]
    fn test_previous_business_day_skips_weekend() {
        // Monday 15 Jan 2024 -> Friday 12 Jan 2024
        assert_eq!(previous_business_day(date(2024, 1, 15)), date(2024, 1, 12));
        // Sunday -> Friday
        assert_eq!(previous_business_day(date(2024, 1, 14)), date(2024, 1, 12));
        // Saturday 6 Jan 2024 -> Friday 5 Jan 2024
        assert_eq!(previous_business_day(date(2024, 1, 6)), date(2024, 1, 5));
    }

    #[test]
    fn test_previous_business_day_never_weekend() {
        let mut day = date(2024, 1, 1);
        for _ in 0..730 {
            let prev = previous_business_day(day);
            assert!(!matches!(prev.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(prev < day);
            day += Duration::days(1);
        }
    }

    #[test]
    fn test_compare_statement_dates() {
        assert_eq!(
            compare_statement_dates("1 Jan 2024", "15 Jan 2024"),
            Ordering::Less
        );
        // Across a month boundary the day number alone would sort wrong
        assert_eq!(
            compare_statement_dates("31 Jan 2024", "1 Feb 2024"),
            Ordering::Less
        );
        assert_eq!(
            compare_statement_dates("31 Dec 2023", "1 Jan 2024"),
            Ordering::Less
        );
        assert_eq!(
            compare_statement_dates("31 Dec 2023", "1 Jan 2023"),
            Ordering::Greater
        );
        assert_eq!(
            compare_statement_dates("15 Jan 2024", "15 Jan 2024"),
            Ordering::Equal
        );
        // Malformed input falls back to Equal instead of panicking
        assert_eq!(
            compare_statement_dates("garbage", "15 Jan 2024"),
            Ordering::Equal
        );
    }
}
