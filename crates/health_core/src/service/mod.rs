//! Use-case services over entity repositories.
//!
//! # Responsibility
//! - Validate schema input before it reaches the repository.
//! - Apply default list filters.
//! - Map repository failures to HTTP-style status codes.

pub mod record_service;

pub use record_service::{
    AppointmentService, DoctorService, MedicalRecordService, PatientService, RecordService,
    ServiceError, ServiceResult,
};
