use health_core::schema::{CreateAppointment, CreatePatient, UpdateAppointment, UpdatePatient};
use health_core::service::{AppointmentService, PatientService};
use health_core::{
    Entity, JsonFileStore, MemoryStore, Record, RecordStore, Repository, ServiceError, StoreError,
};
use serde_json::Value;
use std::fs;

fn create_input(first_name: &str, last_name: &str) -> CreatePatient {
    CreatePatient {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        other_names: None,
        contact: "0244000000".to_string(),
        emergency_contact: "0244111111".to_string(),
        address: "12 Ring Road".to_string(),
        gender: "Male".to_string(),
        age: 30,
        date_of_birth: None,
    }
}

fn patient_service() -> PatientService<MemoryStore> {
    PatientService::new(Repository::new(MemoryStore::new()))
}

#[test]
fn create_normalizes_and_generates_metadata() {
    let service = patient_service();

    let patient = service.create(&create_input("John", "Doe")).unwrap();

    assert_eq!(patient.first_name(), "John");
    assert_eq!(patient.gender().as_str(), "male");
    assert!(!patient.id().is_empty());
    assert!(!patient.is_deleted());
}

#[test]
fn invalid_input_is_422_and_nothing_is_written() {
    let service = patient_service();
    let mut input = create_input("J", "Doe");
    input.gender = "robot".to_string();

    let err = service.create(&input).unwrap_err();
    assert_eq!(err.status_code(), 422);
    let ServiceError::Invalid(validation) = &err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(validation.issues().len(), 2);
    assert!(service.repository().store().read_all().unwrap().is_empty());
}

#[test]
fn unknown_id_maps_to_404_for_every_lookup() {
    let service = patient_service();

    for err in [
        service.get_by_id("missing").unwrap_err(),
        service.delete("missing").unwrap_err(),
        service.restore("missing").unwrap_err(),
        service
            .update("missing", &create_input("John", "Doe"))
            .unwrap_err(),
    ] {
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Record not found: missing");
    }
}

#[test]
fn get_all_defaults_hide_deleted_and_cap_page_size() {
    let service = patient_service();
    let mut ids = Vec::new();
    for index in 0..12 {
        let patient = service
            .create(&create_input("John", &format!("Doe{index:02}")))
            .unwrap();
        ids.push(patient.id().to_string());
    }
    service.delete(&ids[0]).unwrap();

    let page = service.get_all::<&str>(&[], &[]).unwrap();
    assert_eq!(page.len(), 10);
    assert!(page.iter().all(|patient| !patient.is_deleted()));
    assert_eq!(page[0].id(), ids[1]);

    let second = service.get_all(&["page=2"], &[]).unwrap();
    assert_eq!(second.len(), 1);
}

#[test]
fn get_all_parses_filter_and_sort_params() {
    let service = patient_service();
    service.create(&create_input("Ama", "Doe")).unwrap();
    service.create(&create_input("Kofi", "Adams")).unwrap();
    service.create(&create_input("Esi", "Carter")).unwrap();

    let sorted = service
        .get_all(&["is_deleted=false"], &["order_by=last_name", "order_mode=asc"])
        .unwrap();
    let names: Vec<&str> = sorted.iter().map(|patient| patient.last_name()).collect();
    assert_eq!(names, ["Adams", "Carter", "Doe"]);

    let by_age = service.get_all(&["age=30", "bogus"], &[]).unwrap();
    assert_eq!(by_age.len(), 3);
}

#[test]
fn deleted_records_are_listed_on_request_and_restorable() {
    let service = patient_service();
    let patient = service.create(&create_input("John", "Doe")).unwrap();
    service.delete(patient.id()).unwrap();

    let deleted = service.get_all(&["is_deleted=TRUE"], &[]).unwrap();
    assert_eq!(deleted.len(), 1);
    let everything = service.get_all(&["is_deleted=none"], &[]).unwrap();
    assert_eq!(everything.len(), 1);

    let restored = service.restore(patient.id()).unwrap();
    assert!(!restored.is_deleted());
    assert_eq!(service.get_all::<&str>(&[], &[]).unwrap().len(), 1);
}

#[test]
fn update_keeps_read_only_fields() {
    let service = patient_service();
    let patient = service.create(&create_input("John", "Doe")).unwrap();

    let mut update: UpdatePatient = create_input("John", "Mensah");
    update.age = 75;
    let updated = service.update(patient.id(), &update).unwrap();

    assert_eq!(updated.last_name(), "Mensah");
    assert_eq!(updated.age(), 30);
    assert_eq!(updated.patient_number(), patient.patient_number());
    assert!(updated.meta().date_updated().is_some());
}

#[test]
fn appointment_update_cannot_move_patient() {
    let service = AppointmentService::new(Repository::new(MemoryStore::new()));
    let created = service
        .create(&CreateAppointment {
            patient_id: "11111111-2222-4333-8444-555555555555".to_string(),
            doctor_id: "66666666-7777-4888-9999-000000000000".to_string(),
            appointment_date: "2025-03-01 09:30:00".to_string(),
            status: "scheduled".to_string(),
        })
        .unwrap();

    let updated = service
        .update(
            created.id(),
            &UpdateAppointment {
                doctor_id: "66666666-7777-4888-9999-000000000001".to_string(),
                appointment_date: "2025-03-02 10:00:00".to_string(),
                status: "CANCELLED".to_string(),
            },
        )
        .unwrap();

    assert_eq!(updated.patient_id(), created.patient_id());
    assert_eq!(updated.status().as_str(), "cancelled");
}

#[test]
fn corrupt_collection_is_an_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patients.json");
    fs::write(&path, "not json").unwrap();
    let service = PatientService::new(Repository::new(JsonFileStore::open(&path).unwrap()));

    let err = service.get_by_id("any").unwrap_err();
    assert_eq!(err.status_code(), 500);
}

struct RejectingStore;

impl RecordStore for RejectingStore {
    fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(Vec::new())
    }

    fn write_all(&self, _records: &[Record]) -> Result<(), StoreError> {
        Err(StoreError::Encode(
            serde_json::from_str::<Value>("{").unwrap_err(),
        ))
    }
}

#[test]
fn failed_save_maps_to_400() {
    let service = PatientService::new(Repository::new(RejectingStore));

    let err = service.create(&create_input("John", "Doe")).unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(matches!(err, ServiceError::SaveFailed(_)));
}
