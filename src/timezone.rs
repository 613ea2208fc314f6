//! Resolves the server's local timezone, used when matching records against
//! a calendar day picked in the date filter, and parses the ISO timestamps
//! stored on records.

use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use time_tz::{Offset, TimeZone};

use crate::Error;

const DATE_ONLY_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse an ISO-8601 timestamp as stored on records.
///
/// Accepts RFC 3339 date-times and date-only strings ("2026-01-20"), which
/// are read as midnight UTC. Returns `None` for anything else.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(timestamp);
    }

    parse_date(text).map(|date| date.midnight().assume_utc())
}

/// Parse a date-only `YYYY-MM-DD` string.
pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), DATE_ONLY_FORMAT).ok()
}

/// Get the UTC offset in effect right now for a canonical timezone name,
/// e.g. "America/Bogota".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Like [get_local_offset], but logs and returns
/// [Error::InvalidTimezoneError] for unknown timezone names.
pub fn require_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}
