//! Lenient scalar parsing for querystring values.
//!
//! Every function returns `Option`: a value that does not parse is a
//! decline, not an error, so the filter layer can drop the condition and
//! keep the rest of the query.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a timestamp, normalized to UTC.
///
/// Accepts RFC 3339 (`2024-03-01T10:30:00+07:00`), then any of the extra
/// chrono `formats` (tried as a datetime, then as a bare date at
/// midnight), then a plain `YYYY-MM-DD` date. Naive inputs are taken as
/// already being in UTC.
pub fn parse_time(value: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    for format in formats {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Some(t.and_utc());
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return midnight(d);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return midnight(d);
    }
    None
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Parse a base-10 signed integer.
pub fn parse_int(value: &str) -> Option<i64> {
    value.parse().ok()
}

/// Parse a decimal float.
pub fn parse_float(value: &str) -> Option<f64> {
    value.parse().ok()
}
