//! List query model: filter criteria, pagination and sort.
//!
//! # Responsibility
//! - Parse repeated `key=value` query parameters into filter/sort specs.
//! - Apply filter → paginate → sort over raw records, in that order.
//!
//! # Invariants
//! - Each allowed filter key is an independent pass over all records; a record
//!   matching two keys is returned twice.
//! - Pagination slices the filtered result before sorting, so sort only
//!   reorders the current page.
//! - Sorting is stable; `desc` keeps equal records in their original order.

use crate::store::Record;
use serde_json::Value;
use std::cmp::Ordering;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

const PAGE_KEY: &str = "page";
const PAGE_SIZE_KEY: &str = "page_size";
const IS_DELETED_KEY: &str = "is_deleted";
const ORDER_BY_KEY: &str = "order_by";
const ORDER_MODE_KEY: &str = "order_mode";

/// Soft-delete visibility policy (`is_deleted` filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedScope {
    /// `is_deleted=false`: only records without `date_deleted`.
    Active,
    /// `is_deleted=true`: only soft-deleted records.
    Deleted,
    /// `is_deleted=none`: no restriction.
    Any,
}

impl DeletedScope {
    pub fn admits(self, record: &Record) -> bool {
        let deleted = record
            .get("date_deleted")
            .is_some_and(|value| !value.is_null());
        match self {
            Self::Active => !deleted,
            Self::Deleted => deleted,
            Self::Any => true,
        }
    }
}

/// Parsed list filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// Field criteria in the order they were supplied.
    pub criteria: Vec<(String, Value)>,
    /// `None` when the caller did not specify a policy.
    pub is_deleted: Option<DeletedScope>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl Filters {
    /// Splits parsed parameters into criteria and the reserved keys
    /// `page`, `page_size` and `is_deleted`.
    ///
    /// Reserved keys with values of the wrong type are dropped.
    pub fn from_params(params: Vec<(String, Value)>) -> Self {
        let mut filters = Self::default();
        for (key, value) in params {
            match key.as_str() {
                PAGE_KEY => filters.page = value.as_i64(),
                PAGE_SIZE_KEY => filters.page_size = value.as_i64(),
                IS_DELETED_KEY => {
                    filters.is_deleted = match value {
                        Value::Bool(false) => Some(DeletedScope::Active),
                        Value::Bool(true) => Some(DeletedScope::Deleted),
                        Value::Null => Some(DeletedScope::Any),
                        _ => None,
                    }
                }
                _ => filters.criteria.push((key, value)),
            }
        }
        filters
    }

    /// Adds one field criterion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.push((key.into(), value.into()));
        self
    }

    pub fn deleted_scope(mut self, scope: DeletedScope) -> Self {
        self.is_deleted = Some(scope);
        self
    }

    pub fn paginate(mut self, page: i64, page_size: i64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Fills `page=1`, `page_size=10`, `is_deleted=false` where missing.
    pub fn with_defaults(mut self) -> Self {
        self.page.get_or_insert(DEFAULT_PAGE);
        self.page_size.get_or_insert(DEFAULT_PAGE_SIZE);
        self.is_deleted.get_or_insert(DeletedScope::Active);
        self
    }
}

/// Parsed sort options. Applied only when both parts are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub order_by: Option<String>,
    pub order_mode: Option<String>,
}

impl SortSpec {
    pub fn new(order_by: impl Into<String>, order_mode: impl Into<String>) -> Self {
        Self {
            order_by: Some(order_by.into()),
            order_mode: Some(order_mode.into()),
        }
    }

    pub fn from_params(params: Vec<(String, Value)>) -> Self {
        let mut sort = Self::default();
        for (key, value) in params {
            let text = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            match key.as_str() {
                ORDER_BY_KEY => sort.order_by = Some(text),
                ORDER_MODE_KEY => sort.order_mode = Some(text),
                _ => {}
            }
        }
        sort
    }
}

/// Parses repeated `key=value` parameters.
///
/// - Items that do not split into exactly two parts on `=` are skipped.
/// - All-digit values become integers.
/// - `is_deleted` values `true`/`false`/`none` become booleans or `null`.
/// - A repeated key collects its values into a list.
pub fn parse_params<I, T>(items: I) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut params: Vec<(String, Value)> = Vec::new();

    for item in items {
        let mut parts = item.as_ref().split('=');
        let (Some(key), Some(raw), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };

        let value = parse_param_value(key, raw);
        match params.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, Value::Array(values))) => values.push(value),
            Some((_, previous)) => {
                let first = std::mem::take(previous);
                *previous = Value::Array(vec![first, value]);
            }
            None => params.push((key.to_string(), value)),
        }
    }

    params
}

fn parse_param_value(key: &str, raw: &str) -> Value {
    if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(number) = raw.parse::<i64>() {
            return Value::from(number);
        }
    }

    if key == IS_DELETED_KEY {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "none" => return Value::Null,
            _ => {}
        }
    }

    Value::String(raw.to_string())
}

/// Applies allowed criteria as independent passes under the delete policy.
///
/// Without any allowed criterion every record is a candidate and only the
/// delete policy applies. An unspecified policy admits everything.
pub fn apply_filters(records: Vec<Record>, filters: &Filters, allowed: &[String]) -> Vec<Record> {
    let scope = filters.is_deleted.unwrap_or(DeletedScope::Any);
    let active = filters
        .criteria
        .iter()
        .filter(|(key, _)| allowed.iter().any(|field| field == key))
        .collect::<Vec<_>>();

    if active.is_empty() {
        return records
            .into_iter()
            .filter(|record| scope.admits(record))
            .collect();
    }

    let mut matched = Vec::new();
    for (key, value) in active {
        for record in &records {
            if record.get(key) == Some(value) && scope.admits(record) {
                matched.push(record.clone());
            }
        }
    }
    matched
}

/// Returns the `page`-th window of `page_size` records (1-based).
///
/// Non-positive `page`/`page_size` fall back to 1/10.
pub fn apply_pagination(records: Vec<Record>, page: i64, page_size: i64) -> Vec<Record> {
    let page = if page > 0 { page } else { DEFAULT_PAGE };
    let page_size = if page_size > 0 { page_size } else { DEFAULT_PAGE_SIZE };
    let offset = (page - 1).saturating_mul(page_size);

    records
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(page_size).unwrap_or(usize::MAX))
        .collect()
}

/// Stable sort by `order_by`; `desc` reverses, anything else is ascending.
///
/// Records missing the field sort as `null`.
pub fn apply_sort(mut records: Vec<Record>, order_by: &str, order_mode: &str) -> Vec<Record> {
    let descending = order_mode == "desc";
    records.sort_by(|left, right| {
        let ordering = compare_values(
            left.get(order_by).unwrap_or(&Value::Null),
            right.get(order_by).unwrap_or(&Value::Null),
        );
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    records
}

/// Total order over JSON values: null < bool < number < string < array < object.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| compare_values(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(_), Value::Object(_)) => Ordering::Equal,
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_values, parse_params, DeletedScope, Filters, SortSpec};
    use serde_json::{json, Value};
    use std::cmp::Ordering;

    #[test]
    fn parse_params_converts_digits_and_delete_policy() {
        let params = parse_params(["page=2", "first_name=John", "is_deleted= None "]);
        assert_eq!(
            params,
            vec![
                ("page".to_string(), json!(2)),
                ("first_name".to_string(), json!("John")),
                ("is_deleted".to_string(), Value::Null),
            ]
        );
    }

    #[test]
    fn parse_params_skips_malformed_items() {
        let params = parse_params(["no_equals", "a=b=c", "=", "ok=1"]);
        assert_eq!(
            params,
            vec![("".to_string(), json!("")), ("ok".to_string(), json!(1))]
        );
    }

    #[test]
    fn parse_params_collects_repeated_keys() {
        let params = parse_params(["tag=a", "tag=b", "tag=c"]);
        assert_eq!(params, vec![("tag".to_string(), json!(["a", "b", "c"]))]);
    }

    #[test]
    fn filters_split_reserved_keys() {
        let filters = Filters::from_params(parse_params([
            "last_name=Doe",
            "page=3",
            "page_size=5",
            "is_deleted=true",
        ]));
        assert_eq!(filters.criteria, vec![("last_name".to_string(), json!("Doe"))]);
        assert_eq!(filters.page, Some(3));
        assert_eq!(filters.page_size, Some(5));
        assert_eq!(filters.is_deleted, Some(DeletedScope::Deleted));
    }

    #[test]
    fn defaults_only_fill_missing_values() {
        let filters = Filters::default().paginate(4, 2).with_defaults();
        assert_eq!(filters.page, Some(4));
        assert_eq!(filters.page_size, Some(2));
        assert_eq!(filters.is_deleted, Some(DeletedScope::Active));

        let filters = Filters::default()
            .deleted_scope(DeletedScope::Any)
            .with_defaults();
        assert_eq!(filters.page, Some(1));
        assert_eq!(filters.page_size, Some(10));
        assert_eq!(filters.is_deleted, Some(DeletedScope::Any));
    }

    #[test]
    fn sort_spec_reads_order_keys() {
        let sort = SortSpec::from_params(parse_params(["order_by=last_name", "order_mode=desc"]));
        assert_eq!(sort, SortSpec::new("last_name", "desc"));
    }

    #[test]
    fn compare_values_orders_across_types() {
        assert_eq!(compare_values(&json!(null), &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(1.5), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!(["a"]), &json!(["a", "b"])), Ordering::Less);
    }
}
