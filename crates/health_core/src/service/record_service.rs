//! Generic record service.
//!
//! # Invariants
//! - Not-found is 404, a failed save is 400, invalid input is 422 and every
//!   other failure (unreadable store, corrupt stored row) is 500.
//! - `get_all` always fills `page`, `page_size` and `is_deleted` defaults.

use crate::model::{Appointment, Doctor, MedicalRecord, Patient};
use crate::repo::query::{parse_params, Filters, SortSpec};
use crate::repo::repository::{RepoError, Repository};
use crate::schema::{EntitySchemas, Schema, ValidationError};
use crate::store::RecordStore;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(RepoError),
    SaveFailed(RepoError),
    Invalid(ValidationError),
    Internal(RepoError),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::SaveFailed(_) => 400,
            Self::Invalid(_) => 422,
            Self::Internal(_) => 500,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(err) | Self::SaveFailed(err) | Self::Internal(err) => {
                write!(f, "{err}")
            }
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(err) | Self::SaveFailed(err) | Self::Internal(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound(value),
            RepoError::Save(_) => Self::SaveFailed(value),
            other => Self::Internal(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Service facade for one entity type.
pub struct RecordService<E: EntitySchemas, S: RecordStore> {
    repo: Repository<E, S>,
}

pub type PatientService<S> = RecordService<Patient, S>;
pub type DoctorService<S> = RecordService<Doctor, S>;
pub type AppointmentService<S> = RecordService<Appointment, S>;
pub type MedicalRecordService<S> = RecordService<MedicalRecord, S>;

impl<E: EntitySchemas, S: RecordStore> RecordService<E, S> {
    pub fn new(repo: Repository<E, S>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<E, S> {
        &self.repo
    }

    pub fn create(&self, input: &E::Create) -> ServiceResult<E> {
        self.validate(input)?;
        Ok(self.repo.create(&input.to_record())?)
    }

    pub fn get_by_id(&self, id: &str) -> ServiceResult<E> {
        Ok(self.repo.get_by_id(id)?)
    }

    /// Lists entities from raw `key=value` filter and sort parameters.
    pub fn get_all<T: AsRef<str>>(
        &self,
        filter_params: &[T],
        sort_params: &[T],
    ) -> ServiceResult<Vec<E>> {
        let filters = Filters::from_params(parse_params(filter_params));
        let sort = SortSpec::from_params(parse_params(sort_params));
        self.list(filters, sort)
    }

    /// Lists entities from already-parsed filters; missing defaults are filled.
    pub fn list(&self, filters: Filters, sort: SortSpec) -> ServiceResult<Vec<E>> {
        Ok(self.repo.get_all(&filters.with_defaults(), &sort)?)
    }

    pub fn update(&self, id: &str, input: &E::Update) -> ServiceResult<E> {
        self.validate(input)?;
        let existing = self.repo.get_by_id(id)?;
        Ok(self.repo.update(existing, &input.to_record())?)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<E> {
        let existing = self.repo.get_by_id(id)?;
        Ok(self.repo.delete(existing)?)
    }

    pub fn restore(&self, id: &str) -> ServiceResult<E> {
        let existing = self.repo.get_by_id(id)?;
        Ok(self.repo.restore(existing)?)
    }

    fn validate(&self, input: &impl Schema) -> ServiceResult<()> {
        input.validate().map_err(|err| {
            warn!(
                "event=schema_validate module=service status=error entity={} issues={}",
                E::LABEL,
                err.issues().len()
            );
            ServiceError::from(err)
        })
    }
}
