//! Date/time parsing and formatting.
//!
//! Backend timestamps arrive as `yyyy-MM-dd HH:mm:ss`, `yyyy-MM-dd HH:mm` or
//! `yyyy-MM-dd`. Every function here is stateless; unparseable input yields
//! `None` rather than an error.

use chrono::{NaiveDate, NaiveDateTime};

/// Datetime formats, longest first.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Calendar date format used for index keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a backend datetime string.
///
/// A bare date parses as midnight of that day.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse the calendar date part of any accepted backend string.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

/// Format a date as an index key (`yyyy-MM-dd`).
pub fn format_date_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a datetime in the long backend shape (`yyyy-MM-dd HH:mm:ss`).
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMATS[0]).to_string()
}

/// Format a day-selector label with a strftime pattern.
///
/// Falls back to the index key when the pattern is not a valid format.
pub fn format_day_label(date: NaiveDate, pattern: &str) -> String {
    use std::fmt::Write;

    let mut label = String::new();
    if write!(label, "{}", date.format(pattern)).is_err() {
        log::warn!("[DateIndex] Invalid day label format '{}'", pattern);
        return format_date_string(date);
    }
    label
}
