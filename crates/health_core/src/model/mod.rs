//! Domain objects for health records.
//!
//! # Responsibility
//! - Define typed entities and their flat `Record` serialization.
//! - Normalize on construction: generated ids, strict dates, derived fields.
//!
//! # Invariants
//! - Every entity carries a `RecordMeta` with a stable `id`.
//! - `from_record(to_record(x)) == x` for every valid entity.
//! - Soft delete is represented by `date_deleted`, never by row removal.
//! - Read-only fields expose accessors only; mutable fields have setters.

use crate::store::Record;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod appointment;
pub mod datetime;
pub(crate) mod fields;
pub mod doctor;
pub mod medical_record;
pub mod patient;

pub use appointment::{Appointment, AppointmentStatus};
pub use doctor::Doctor;
pub use medical_record::MedicalRecord;
pub use patient::{Gender, Patient};

pub type ModelResult<T> = Result<T, ModelError>;

/// Construction/deserialization failure for a domain object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidDateFormat(String),
    MissingField(String),
    InvalidField { field: String, message: String },
}

impl ModelError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFormat(value) => write!(
                f,
                "Invalid date format: {value}. Expected format: {}",
                datetime::DATE_FORMAT
            ),
            Self::MissingField(field) => write!(f, "missing field `{field}`"),
            Self::InvalidField { field, message } => write!(f, "invalid field `{field}`: {message}"),
        }
    }
}

impl Error for ModelError {}

/// Identity and lifecycle timestamps shared by every entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    id: String,
    date_created: NaiveDateTime,
    date_updated: Option<NaiveDateTime>,
    date_deleted: Option<NaiveDateTime>,
}

impl RecordMeta {
    /// Fresh metadata: generated UUIDv4 id, created now.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date_created: datetime::now(),
            date_updated: None,
            date_deleted: None,
        }
    }

    /// Reads metadata from a record, generating `id` and `date_created`
    /// when they are absent.
    pub fn from_record(record: &Record) -> ModelResult<Self> {
        let id = fields::optional_string("id", record.get("id"))?
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let date_created = fields::optional_date("date_created", record.get("date_created"))?
            .unwrap_or_else(datetime::now);

        Ok(Self {
            id,
            date_created,
            date_updated: fields::optional_date("date_updated", record.get("date_updated"))?,
            date_deleted: fields::optional_date("date_deleted", record.get("date_deleted"))?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date_created(&self) -> NaiveDateTime {
        self.date_created
    }

    pub fn date_updated(&self) -> Option<NaiveDateTime> {
        self.date_updated
    }

    pub fn date_deleted(&self) -> Option<NaiveDateTime> {
        self.date_deleted
    }

    pub fn set_date_updated(&mut self, value: Option<NaiveDateTime>) {
        self.date_updated = value;
    }

    pub fn set_date_deleted(&mut self, value: Option<NaiveDateTime>) {
        self.date_deleted = value;
    }

    /// Refreshes `date_updated` to now.
    pub fn touch(&mut self) {
        self.date_updated = Some(datetime::now());
    }

    pub fn is_deleted(&self) -> bool {
        self.date_deleted.is_some()
    }

    pub(crate) fn write_id(&self, record: &mut Record) {
        record.insert("id".to_string(), Value::String(self.id.clone()));
    }

    pub(crate) fn write_dates(&self, record: &mut Record) {
        record.insert(
            "date_created".to_string(),
            datetime::datetime_value(Some(&self.date_created)),
        );
        record.insert(
            "date_updated".to_string(),
            datetime::datetime_value(self.date_updated.as_ref()),
        );
        record.insert(
            "date_deleted".to_string(),
            datetime::datetime_value(self.date_deleted.as_ref()),
        );
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A domain object persisted as one flat record in its own collection.
pub trait Entity: Clone + Sized {
    /// Human-readable singular name, e.g. `Patient`.
    const LABEL: &'static str;
    /// Collection (file stem) holding this entity, e.g. `patients`.
    const COLLECTION: &'static str;
    /// Default fields accepted as filter keys.
    const FILTER_FIELDS: &'static [&'static str];
    /// Default fields accepted as `order_by` values.
    const SORT_FIELDS: &'static [&'static str];

    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Serializes into the flat record shape persisted on disk.
    fn to_record(&self) -> Record;

    /// Builds the entity from a flat record, normalizing as on construction.
    fn from_record(record: &Record) -> ModelResult<Self>;

    /// Sets one field through its setter.
    ///
    /// Returns `Ok(false)` when `field` has no setter (read-only or unknown).
    fn apply_field(&mut self, field: &str, value: &Value) -> ModelResult<bool>;

    fn id(&self) -> &str {
        self.meta().id()
    }

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted()
    }

    /// Marks the entity deleted now.
    fn soft_delete(&mut self) -> &mut Self {
        self.meta_mut().set_date_deleted(Some(datetime::now()));
        self
    }

    /// Clears the deletion mark. Idempotent.
    fn restore(&mut self) -> &mut Self {
        self.meta_mut().set_date_deleted(None);
        self
    }
}
