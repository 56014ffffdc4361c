//! Core domain logic for the health records backend.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::{
    Appointment, AppointmentStatus, Doctor, Entity, Gender, MedicalRecord, ModelError, Patient,
    RecordMeta,
};
pub use repo::query::{DeletedScope, Filters, SortSpec};
pub use repo::repository::{RepoError, RepoResult, Repository};
pub use schema::{EntitySchemas, Schema, ValidationError};
pub use service::{RecordService, ServiceError, ServiceResult};
pub use store::{JsonFileStore, MemoryStore, Record, RecordStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
