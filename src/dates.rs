//! Lenient date parsing shared by filtering, bucketing and downtime.
//!
//! Dates arrive from the data-access layer as strings. Parsing is lazy so that
//! a single malformed value only drops the record out of the computation that
//! needed the date, never out of the whole batch.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Canonical serialized form of an instant
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const INSTANT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

/// A date or time value that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed date: {input:?}")]
pub struct MalformedDateError {
    pub input: String,
}

impl MalformedDateError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Parse a calendar date. Accepts plain dates as well as full instants, in
/// which case the time part is dropped.
pub fn parse_date(input: &str) -> Result<NaiveDate, MalformedDateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MalformedDateError::new(input));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_instant(trimmed).ok().map(|dt| dt.date()))
        .ok_or_else(|| MalformedDateError::new(input))
}

/// Parse a wall-clock instant. Values carrying an offset are converted to
/// host local time, the frame of opening dates and `SystemClock`; a bare date
/// is taken as midnight.
pub fn parse_instant(input: &str) -> Result<NaiveDateTime, MalformedDateError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    INSTANT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| MalformedDateError::new(input))
}

/// Parse a time of day. An empty string means midnight.
pub fn parse_time(input: &str) -> Result<NaiveTime, MalformedDateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(NaiveTime::MIN);
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| MalformedDateError::new(input))
}

/// Combine a date field and a time field into one instant
pub fn combine(date: &str, time: &str) -> Result<NaiveDateTime, MalformedDateError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(date.and_time(time))
}

/// Serde adapter for instants that accepts every form `parse_instant` does
pub mod lenient {
    use super::*;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(INSTANT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module, for optional fields
    pub mod option {
        use super::*;

        pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_str(&dt.format(INSTANT_FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => parse_instant(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_date_forms() {
        let d = parse_date("2024-03-15").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 3, 15));

        let d = parse_date("2024-03-15T10:20:00").unwrap();
        assert_eq!(d.month(), 3);

        let d = parse_date("2024-03-15T10:20:00.000Z").unwrap();
        assert_eq!(d.day(), 15);

        assert!(parse_date("").is_err());
        assert!(parse_date("15 March").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_instant_forms() {
        let dt = parse_instant("2024-01-02T02:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (2, 30));

        let dt = parse_instant("2024-01-02T02:30").unwrap();
        assert_eq!(dt.minute(), 30);

        let dt = parse_instant("2024-01-02").unwrap();
        assert_eq!(dt.hour(), 0);

        assert!(parse_instant("not a date").is_err());
    }

    #[test]
    fn test_offset_instants_land_in_local_time() {
        let raw = "2024-01-01T00:00:00+03:00";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_instant(raw).unwrap(), expected);

        let utc = parse_instant("2023-12-31T21:00:00Z").unwrap();
        assert_eq!(utc, expected);
    }

    #[test]
    fn test_combine() {
        let dt = combine("2024-01-01", "08:45").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (8, 45));

        let dt = combine("2024-01-01", "").unwrap();
        assert_eq!(dt.hour(), 0);

        let err = combine("2024-01-01", "25:99").unwrap_err();
        assert_eq!(err.input, "25:99");
    }
}
