use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::report::error::ReportError;

/// Parses an IANA zone identifier such as `Europe/Warsaw` or `UTC`
pub fn parse_zone(id: &str) -> Result<Tz, ReportError> {
    id.trim()
        .parse::<Tz>()
        .map_err(|_| ReportError::UnknownTimeZone(id.to_string()))
}

pub fn to_zone(instant: DateTime<Utc>, zone: Tz) -> DateTime<Tz> {
    instant.with_timezone(&zone)
}
