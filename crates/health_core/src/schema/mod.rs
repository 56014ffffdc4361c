//! Request input schemas and field validation.
//!
//! # Responsibility
//! - Define typed create/update inputs per entity.
//! - Collect every field violation into one `ValidationError`.
//! - Emit normalized flat records for the repository.
//!
//! # Invariants
//! - `to_record` is only meaningful after `validate` succeeded.
//! - Update records only carry fields the caller may change.

use crate::model::datetime::parse_datetime;
use crate::model::Entity;
use crate::store::Record;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod appointment;
mod doctor;
mod medical_record;
mod patient;

pub use appointment::{CreateAppointment, UpdateAppointment};
pub use doctor::{CreateDoctor, UpdateDoctor};
pub use medical_record::{CreateMedicalRecord, UpdateMedicalRecord};
pub use patient::{CreatePatient, UpdatePatient};

const DATE_FORMAT_MESSAGE: &str = "Invalid date format. Expected format: YYYY-MM-DD HH:MM:SS";

/// One or more invalid input fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<String>,
}

impl ValidationError {
    pub fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid data: [{}]", self.issues.join("; "))
    }
}

impl Error for ValidationError {}

/// A validated request input convertible to a flat record.
pub trait Schema {
    fn validate(&self) -> Result<(), ValidationError>;
    fn to_record(&self) -> Record;
}

/// Binds an entity to its create and update inputs.
pub trait EntitySchemas: Entity {
    type Create: Schema + DeserializeOwned;
    type Update: Schema + DeserializeOwned;
}

/// Accumulates field violations.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    issues: Vec<String>,
}

impl Checker {
    pub(crate) fn min_length(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.issues.push(format!(
                "{field}: String should have at least {min} characters"
            ));
        }
    }

    pub(crate) fn uuid_v4(&mut self, field: &str, value: &str) {
        if !is_canonical_uuid_v4(value) {
            self.issues.push(format!("{field}: Invalid id format."));
        }
    }

    pub(crate) fn date(&mut self, field: &str, value: &str) {
        if parse_datetime(value).is_err() {
            self.issues.push(format!("{field}: {DATE_FORMAT_MESSAGE}"));
        }
    }

    pub(crate) fn ensure(&mut self, ok: bool, message: impl FnOnce() -> String) {
        if !ok {
            self.issues.push(message());
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.issues))
        }
    }
}

/// Accepts only lowercase hyphenated version-4 UUIDs.
pub fn is_canonical_uuid_v4(value: &str) -> bool {
    Uuid::parse_str(value).is_ok_and(|uuid| {
        uuid.get_version_num() == 4 && uuid.hyphenated().to_string() == value
    })
}
