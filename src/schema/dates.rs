//! Date handling for attributes declared as dates, timestamps or times.
//!
//! The backend sends timestamps as `YYYY-MM-DD HH:MM:SS` in UTC. The same
//! format string is used to write them back, so a read/write/read cycle keeps
//! second precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a server timestamp as UTC. RFC 3339 strings are accepted as well.
pub fn parse_datetime(value: &str, format: Option<&str>) -> Result<DateTime<Utc>, chrono::ParseError> {
    let format = format.unwrap_or(DATETIME_FORMAT);
    match NaiveDateTime::parse_from_str(value, format) {
        Ok(naive) => Ok(Utc.from_utc_datetime(&naive)),
        Err(err) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| err),
    }
}

pub fn parse_date(value: &str, format: Option<&str>) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, format.unwrap_or(DATE_FORMAT))
}

/// Parse a time of day. `HH:MM:SS` is accepted next to the declared format.
pub fn parse_time(value: &str, format: Option<&str>) -> Result<NaiveTime, chrono::ParseError> {
    match NaiveTime::parse_from_str(value, format.unwrap_or(TIME_FORMAT)) {
        Ok(time) => Ok(time),
        Err(err) => NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|_| err),
    }
}

pub fn format_datetime(value: &DateTime<Utc>, format: Option<&str>) -> String {
    value.format(format.unwrap_or(DATETIME_FORMAT)).to_string()
}

pub fn format_date(value: &NaiveDate, format: Option<&str>) -> String {
    value.format(format.unwrap_or(DATE_FORMAT)).to_string()
}

pub fn format_time(value: &NaiveTime, format: Option<&str>) -> String {
    value.format(format.unwrap_or(TIME_FORMAT)).to_string()
}
