//! Typed extraction of record values.
//!
//! `null` and absence are treated the same for optional fields.

use super::datetime::parse_datetime;
use super::{ModelError, ModelResult};
use chrono::NaiveDateTime;
use serde_json::Value;

pub(crate) fn required_string(field: &str, value: Option<&Value>) -> ModelResult<String> {
    optional_string(field, value)?.ok_or_else(|| ModelError::MissingField(field.to_string()))
}

pub(crate) fn optional_string(field: &str, value: Option<&Value>) -> ModelResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ModelError::invalid(field, "expected a string")),
    }
}

pub(crate) fn optional_u32(field: &str, value: Option<&Value>) -> ModelResult<Option<u32>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ModelError::invalid(field, "expected a non-negative integer")),
        Some(_) => Err(ModelError::invalid(field, "expected a non-negative integer")),
    }
}

pub(crate) fn required_u32(field: &str, value: Option<&Value>) -> ModelResult<u32> {
    optional_u32(field, value)?.ok_or_else(|| ModelError::MissingField(field.to_string()))
}

/// Parses an optional date; empty strings read as absent.
pub(crate) fn optional_date(field: &str, value: Option<&Value>) -> ModelResult<Option<NaiveDateTime>> {
    match optional_string(field, value)? {
        Some(text) if !text.is_empty() => parse_datetime(&text).map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn required_date(field: &str, value: Option<&Value>) -> ModelResult<NaiveDateTime> {
    optional_date(field, value)?.ok_or_else(|| ModelError::MissingField(field.to_string()))
}

pub(crate) fn string_list(field: &str, value: Option<&Value>) -> ModelResult<Vec<String>> {
    match value {
        None | Some(Value::Null) => Err(ModelError::MissingField(field.to_string())),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok(text.clone()),
                _ => Err(ModelError::invalid(field, "expected a list of strings")),
            })
            .collect(),
        Some(_) => Err(ModelError::invalid(field, "expected a list of strings")),
    }
}

pub(crate) fn string_list_value(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

pub(crate) fn optional_string_value(value: Option<&String>) -> Value {
    value.map_or(Value::Null, |text| Value::String(text.clone()))
}

#[cfg(test)]
mod tests {
    use super::{optional_date, optional_u32, required_string, string_list};
    use crate::model::ModelError;
    use serde_json::json;

    #[test]
    fn null_and_absent_are_equivalent_for_optional_fields() {
        assert_eq!(optional_u32("age", None).unwrap(), None);
        assert_eq!(optional_u32("age", Some(&json!(null))).unwrap(), None);
        assert_eq!(optional_date("d", Some(&json!(""))).unwrap(), None);
    }

    #[test]
    fn required_string_reports_missing_and_wrong_type() {
        assert_eq!(
            required_string("first_name", None).unwrap_err(),
            ModelError::MissingField("first_name".to_string())
        );
        assert!(matches!(
            required_string("first_name", Some(&json!(3))).unwrap_err(),
            ModelError::InvalidField { .. }
        ));
    }

    #[test]
    fn negative_numbers_are_rejected_for_unsigned_fields() {
        assert!(optional_u32("age", Some(&json!(-1))).is_err());
    }

    #[test]
    fn string_list_requires_string_items() {
        assert_eq!(
            string_list("diagnosis", Some(&json!(["Flu", "Cold"]))).unwrap(),
            vec!["Flu".to_string(), "Cold".to_string()]
        );
        assert!(string_list("diagnosis", Some(&json!(["Flu", 1]))).is_err());
    }
}
