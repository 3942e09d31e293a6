//! Wall-clock timestamp helpers.
//!
//! Ticket timestamps are stored as `YYYY-MM-DD HH:mm` strings in the
//! helpdesk's local time. Parsing swaps the space separator for `T` so the
//! same ISO-8601 forms are accepted.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Format used when writing `updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const ISO_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a ticket timestamp.
///
/// # Returns
/// `None` when the value is not a recognizable date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let normalized = value.trim().replacen(' ', "T", 1);
    if normalized.is_empty() {
        return None;
    }
    for format in ISO_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Render a timestamp in the ticket storage format.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local wall-clock time.
pub fn current_timestamp() -> NaiveDateTime {
    Local::now().naive_local()
}
