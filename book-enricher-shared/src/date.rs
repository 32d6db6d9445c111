//! Compact date normalization.
//!
//! Upstream systems carry dates as eight-digit `YYYYMMDD` strings. Both the
//! change-event reader (to derive the lookup date) and the refiner (to
//! canonicalize the publication date) go through [`normalize_compact_date`].

use chrono::NaiveDate;
use thiserror::Error;

/// Number of digits in a compact `YYYYMMDD` date.
const COMPACT_DATE_LEN: usize = 8;

/// Errors produced while normalizing a compact date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// The input is not exactly eight ASCII digits.
    #[error("Malformed compact date '{0}': expected YYYYMMDD")]
    Malformed(String),

    /// The digits do not form a valid calendar date.
    #[error("Compact date '{0}' is not a valid calendar date")]
    OutOfRange(String),
}

/// Parse a compact `YYYYMMDD` string into a calendar date.
///
/// The input must be exactly eight ASCII digits. Shorter or longer inputs are
/// rejected rather than guessed at, so `"2024121"` is an error and not the
/// first of December.
///
/// # Example
///
/// ```
/// use book_enricher_shared::{format_iso_date, normalize_compact_date};
///
/// let date = normalize_compact_date("20240214").unwrap();
/// assert_eq!(format_iso_date(&date), "2024-02-14");
/// ```
pub fn normalize_compact_date(raw: &str) -> Result<NaiveDate, DateError> {
    if raw.len() != COMPACT_DATE_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::Malformed(raw.to_string()));
    }

    let malformed = || DateError::Malformed(raw.to_string());
    let year: i32 = raw[0..4].parse().map_err(|_| malformed())?;
    let month: u32 = raw[4..6].parse().map_err(|_| malformed())?;
    let day: u32 = raw[6..8].parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::OutOfRange(raw.to_string()))
}

/// Render a date in canonical `YYYY-MM-DD` form.
pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_valid_date() {
        let date = normalize_compact_date("20240214").unwrap();
        assert_eq!(format_iso_date(&date), "2024-02-14");
    }

    #[test]
    fn test_normalize_leap_day() {
        let date = normalize_compact_date("20240229").unwrap();
        assert_eq!(format_iso_date(&date), "2024-02-29");
    }

    #[test]
    fn test_seven_digit_input_is_malformed() {
        let result = normalize_compact_date("2024021");
        assert!(matches!(result, Err(DateError::Malformed(_))));
    }

    #[test]
    fn test_non_digit_input_is_malformed() {
        assert!(matches!(
            normalize_compact_date("2024-02-"),
            Err(DateError::Malformed(_))
        ));
        assert!(matches!(
            normalize_compact_date(""),
            Err(DateError::Malformed(_))
        ));
        assert!(matches!(
            normalize_compact_date("２０２４０２１４"),
            Err(DateError::Malformed(_))
        ));
    }

    #[test]
    fn test_impossible_calendar_date() {
        assert!(matches!(
            normalize_compact_date("20230229"),
            Err(DateError::OutOfRange(_))
        ));
        assert!(matches!(
            normalize_compact_date("20241301"),
            Err(DateError::OutOfRange(_))
        ));
    }
}
