//! # Temporal Parsing: Form Dates and Date-Times
//!
//! Form inputs carry dates as `YYYY-MM-DD` and date-times as
//! `YYYY-MM-DD HH:mm`. This module parses both and renders the
//! normalized forms stored in a field value.
//!
//! ## Invariants
//!
//! - Date parsing is strict: exactly four year digits, two month digits
//!   and two day digits separated by `-`, and the result must be a real
//!   calendar day (`2024-02-30` is rejected, `2024-02-29` is accepted).
//! - Date-times carry no offset on input and are interpreted as UTC. The
//!   output is always `YYYY-MM-DDTHH:MM:SS.sssZ`.
//! - Both renderings parse back to themselves, so normalizing twice is
//!   the same as normalizing once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Input layout for form dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input layouts for form date-times, tried in order.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a strict `YYYY-MM-DD` date.
///
/// Returns `None` if the text deviates from the layout in any way
/// (padding, separators, length) or names a day that does not exist.
pub fn parse_strict_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a form date-time.
///
/// Accepts, in order of preference:
/// - `YYYY-MM-DD HH:mm` (and `YYYY-MM-DD HH:mm:ss`), read as UTC;
/// - a bare `YYYY-MM-DD`, read as midnight UTC;
/// - an RFC 3339 timestamp with any offset, converted to UTC.
///
/// Surrounding whitespace is ignored.
pub fn parse_form_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    if let Some(date) = parse_strict_date(text) {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a date-time as ISO 8601 with millisecond precision and a `Z`
/// suffix (e.g. `2024-01-05T10:30:00.000Z`).
pub fn to_iso_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- strict dates ----

    #[test]
    fn strict_date_accepts_leap_day() {
        let d = parse_strict_date("2024-02-29").unwrap();
        assert_eq!(format_date(d), "2024-02-29");
    }

    #[test]
    fn strict_date_rejects_impossible_day() {
        assert!(parse_strict_date("2024-02-30").is_none());
        assert!(parse_strict_date("2023-02-29").is_none());
        assert!(parse_strict_date("2024-13-01").is_none());
    }

    #[test]
    fn strict_date_rejects_loose_layouts() {
        assert!(parse_strict_date("2024-2-29").is_none());
        assert!(parse_strict_date("2024/02/29").is_none());
        assert!(parse_strict_date(" 2024-02-29").is_none());
        assert!(parse_strict_date("2024-02-29T00:00").is_none());
        assert!(parse_strict_date("").is_none());
        assert!(parse_strict_date("２０２４-02-29").is_none());
    }

    // ---- date-times ----

    #[test]
    fn datetime_form_layout() {
        let dt = parse_form_datetime("2024-01-05 10:30").unwrap();
        assert_eq!(to_iso_millis(&dt), "2024-01-05T10:30:00.000Z");
    }

    #[test]
    fn datetime_with_seconds() {
        let dt = parse_form_datetime("2024-01-05 10:30:15").unwrap();
        assert_eq!(to_iso_millis(&dt), "2024-01-05T10:30:15.000Z");
    }

    #[test]
    fn datetime_bare_date_is_midnight() {
        let dt = parse_form_datetime("2024-01-05").unwrap();
        assert_eq!(to_iso_millis(&dt), "2024-01-05T00:00:00.000Z");
    }

    #[test]
    fn datetime_rfc3339_converted_to_utc() {
        let dt = parse_form_datetime("2024-01-05T15:30:00+05:00").unwrap();
        assert_eq!(to_iso_millis(&dt), "2024-01-05T10:30:00.000Z");
    }

    #[test]
    fn datetime_output_parses_back_to_itself() {
        let first = to_iso_millis(&parse_form_datetime("2024-07-01 08:05").unwrap());
        let second = to_iso_millis(&parse_form_datetime(&first).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn datetime_rejects_garbage() {
        assert!(parse_form_datetime("tomorrow").is_none());
        assert!(parse_form_datetime("2024-01-05 25:00").is_none());
        assert!(parse_form_datetime("").is_none());
    }
}
