//! UTC timestamp parsing for calendar and task records.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses an ISO-8601 timestamp string into a UTC instant.
///
/// Accepts an explicit offset (`2026-03-01T09:00:00+02:00`), the trailing
/// literal `Z`, or a naive timestamp (`2026-03-01T09:00:00`) which is taken
/// to already be in UTC. Every comparison downstream happens on the returned
/// UTC instant, so mixed-zone source data stays sane.
pub fn parse_datetime_utc(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(instant) => Ok(instant.with_timezone(&Utc)),
        Err(_) => value.parse::<NaiveDateTime>().map(|naive| naive.and_utc()),
    }
}
