//! Fixed `YYYY-MM-DD HH:MM:SS` timestamp format used by every record.

use super::{ModelError, ModelResult};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static DATE_STRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("valid date pattern regex")
});

/// Current UTC time truncated to whole seconds, the precision records keep.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// Parses a strict `YYYY-MM-DD HH:MM:SS` string.
///
/// # Errors
/// - `InvalidDateFormat` when the shape does not match or the calendar value
///   does not exist (e.g. month 13).
pub fn parse_datetime(value: &str) -> ModelResult<NaiveDateTime> {
    if !DATE_STRING_RE.is_match(value) {
        return Err(ModelError::InvalidDateFormat(value.to_string()));
    }
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ModelError::InvalidDateFormat(value.to_string()))
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Serializes an optional timestamp, keeping `None` as JSON `null`.
pub fn datetime_value(value: Option<&NaiveDateTime>) -> Value {
    value.map_or(Value::Null, |date| Value::String(format_datetime(date)))
}

#[cfg(test)]
mod tests {
    use super::{format_datetime, now, parse_datetime};
    use crate::model::ModelError;
    use chrono::Timelike;

    #[test]
    fn parse_accepts_strict_format_and_round_trips() {
        let parsed = parse_datetime("2023-10-01 10:00:00").unwrap();
        assert_eq!(format_datetime(&parsed), "2023-10-01 10:00:00");
    }

    #[test]
    fn parse_rejects_other_shapes() {
        for value in [
            "2023-10-01",
            "2023-10-01T10:00:00",
            "2023-10-01 10:00:00Z",
            " 2023-10-01 10:00:00",
        ] {
            let err = parse_datetime(value).unwrap_err();
            assert_eq!(err, ModelError::InvalidDateFormat(value.to_string()));
        }
    }

    #[test]
    fn parse_rejects_impossible_calendar_values() {
        assert!(parse_datetime("2023-13-01 10:00:00").is_err());
        assert!(parse_datetime("2023-02-30 10:00:00").is_err());
    }

    #[test]
    fn now_has_no_subsecond_part() {
        assert_eq!(now().nanosecond(), 0);
    }
}
