use chrono::prelude::*;
use chrono::LocalResult;
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidTimeError {
    #[error("Datetime: {0} is malformed")]
    Malformed(String),
    #[error("Local time: {0} does not exist in the timezone: {1}")]
    NonExistent(NaiveDateTime, Tz),
}

/// Resolve a user-entered local wall-clock time to the absolute instant it
/// denotes in the given timezone. A local time inside a DST gap does not
/// exist and is rejected; a local time inside a DST overlap resolves to the
/// first (pre-transition) occurrence.
pub fn to_absolute(local: NaiveDateTime, timezone: Tz) -> Result<DateTime<Utc>, InvalidTimeError> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(InvalidTimeError::NonExistent(local, timezone)),
    }
}

/// Re-derive the display-local time for an absolute instant.
pub fn to_local(instant: DateTime<Utc>, timezone: Tz) -> DateTime<Tz> {
    instant.with_timezone(&timezone)
}

/// Parse a `scheduledFor` value from the API. An RFC 3339 datetime already
/// carries its offset and is taken as-is; a naive datetime is treated as
/// wall-clock in the given timezone and resolved through `to_absolute`.
pub fn parse_scheduled_for(raw: &str, timezone: Tz) -> Result<DateTime<Utc>, InvalidTimeError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let local = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| InvalidTimeError::Malformed(raw.to_string()))?;
    to_absolute(local, timezone)
}
