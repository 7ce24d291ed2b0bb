//! Fixed-priority date format matching.
//!
//! The format table lives in [`crate::constants::date_formats`]; formats are
//! tried in order and the first successful parse wins, which is what makes
//! ambiguous slash-delimited dates resolve as month/day/year.

use chrono::NaiveDate;

use crate::constants::date_formats;

use super::NormalizedDate;

/// Parse a raw date string against the accepted formats in priority order
///
/// Empty and unmatchable input yield [`NormalizedDate::Unknown`].
pub fn parse_with_priority(raw: &str) -> NormalizedDate {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedDate::Unknown;
    }

    for format in date_formats::PRIORITY {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return NormalizedDate::Canonical(date);
        }
    }

    NormalizedDate::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_is_a_fixed_point() {
        assert_eq!(
            parse_with_priority("2025-07-18").iso8601().as_deref(),
            Some("2025-07-18")
        );
    }

    #[test]
    fn test_ambiguous_slash_date_resolves_month_first() {
        assert_eq!(
            parse_with_priority("07/30/2025").iso8601().as_deref(),
            Some("2025-07-30")
        );
        // 07/03/2025 could be MDY or DMY; MDY has priority
        assert_eq!(
            parse_with_priority("07/03/2025").iso8601().as_deref(),
            Some("2025-07-03")
        );
    }

    #[test]
    fn test_day_month_year_still_matches_when_month_slot_overflows() {
        assert_eq!(
            parse_with_priority("30/07/2025").iso8601().as_deref(),
            Some("2025-07-30")
        );
    }

    #[test]
    fn test_month_name_formats() {
        assert_eq!(
            parse_with_priority("Jul 30, 2025").iso8601().as_deref(),
            Some("2025-07-30")
        );
        assert_eq!(
            parse_with_priority("July 30, 2025").iso8601().as_deref(),
            Some("2025-07-30")
        );
        assert_eq!(
            parse_with_priority("30 Jul 2025").iso8601().as_deref(),
            Some("2025-07-30")
        );
        assert_eq!(
            parse_with_priority("30 July 2025").iso8601().as_deref(),
            Some("2025-07-30")
        );
    }

    #[test]
    fn test_unparseable_input_is_unknown_not_an_error() {
        assert!(parse_with_priority("not-a-date").is_unknown());
        assert!(parse_with_priority("").is_unknown());
        assert!(parse_with_priority("   ").is_unknown());
        assert!(parse_with_priority("2025-13-40").is_unknown());
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        assert_eq!(
            parse_with_priority("  2025-07-18  ").iso8601().as_deref(),
            Some("2025-07-18")
        );
    }
}
