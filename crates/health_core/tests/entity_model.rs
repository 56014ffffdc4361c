use chrono::{Datelike, Utc};
use health_core::model::datetime::{format_datetime, parse_datetime};
use health_core::{
    Appointment, AppointmentStatus, Doctor, Entity, Gender, MedicalRecord, ModelError, Patient,
    Record,
};
use serde_json::{json, Value};

fn record(value: Value) -> Record {
    value.as_object().unwrap().clone()
}

fn patient_record() -> Record {
    record(json!({
        "first_name": "John",
        "last_name": "Doe",
        "gender": "male",
        "contact": "0244000000",
        "address": "12 Ring Road",
        "emergency_contact": "0244111111",
        "age": 30
    }))
}

#[test]
fn new_patient_gets_id_creation_date_and_no_deletion() {
    let before = Utc::now().naive_utc() - chrono::Duration::seconds(1);
    let patient = Patient::from_record(&patient_record()).unwrap();

    assert_eq!(patient.id().len(), 36);
    assert!(patient.meta().date_created() >= before);
    assert!(patient.meta().date_updated().is_none());
    assert!(patient.meta().date_deleted().is_none());
    assert!(patient.patient_number().starts_with("P-"));
    assert_eq!(patient.gender(), Gender::Male);

    let stored = patient.to_record();
    assert_eq!(stored["date_deleted"], Value::Null);
    assert_eq!(stored["date_of_birth"], Value::Null);
}

#[test]
fn record_round_trip_is_lossless() {
    let mut patient = Patient::from_record(&patient_record()).unwrap();
    patient.soft_delete();
    patient.meta_mut().touch();

    let again = Patient::from_record(&patient.to_record()).unwrap();
    assert_eq!(again, patient);

    let doctor = Doctor::from_record(&record(json!({
        "first_name": "Ama",
        "last_name": "Mensah",
        "contact": "0200000000",
        "specialty": "Cardiology",
        "years_of_experience": 12
    })))
    .unwrap();
    assert_eq!(Doctor::from_record(&doctor.to_record()).unwrap(), doctor);
}

#[test]
fn soft_delete_then_restore_clears_date_deleted() {
    let mut patient = Patient::from_record(&patient_record()).unwrap();

    patient.soft_delete();
    assert!(patient.is_deleted());

    patient.restore().restore();
    assert!(!patient.is_deleted());
    assert_eq!(patient.to_record()["date_deleted"], Value::Null);
}

#[test]
fn age_is_derived_from_date_of_birth_when_missing() {
    let mut data = patient_record();
    data.remove("age");
    data.insert("date_of_birth".into(), json!("1990-06-15 00:00:00"));

    let patient = Patient::from_record(&data).unwrap();
    let expected = u32::try_from(Utc::now().year() - 1990).unwrap();
    assert_eq!(patient.age(), expected);
}

#[test]
fn missing_age_and_birth_date_is_an_error() {
    let mut data = patient_record();
    data.remove("age");

    let err = Patient::from_record(&data).unwrap_err();
    assert_eq!(err, ModelError::MissingField("age".to_string()));
}

#[test]
fn invalid_dates_are_rejected() {
    let mut data = patient_record();
    data.insert("date_created".into(), json!("2024/01/01 10:00:00"));
    assert!(matches!(
        Patient::from_record(&data),
        Err(ModelError::InvalidDateFormat(_))
    ));

    assert!(parse_datetime("2024-02-30 10:00:00").is_err());
    assert!(parse_datetime("2024-01-01T10:00:00").is_err());
    let parsed = parse_datetime("2024-02-29 23:59:59").unwrap();
    assert_eq!(format_datetime(&parsed), "2024-02-29 23:59:59");
}

#[test]
fn patient_read_only_age_has_no_setter() {
    let mut patient = Patient::from_record(&patient_record()).unwrap();

    assert!(!patient.apply_field("age", &json!(99)).unwrap());
    assert_eq!(patient.age(), 30);

    assert!(patient.apply_field("last_name", &json!("Smith")).unwrap());
    assert_eq!(patient.last_name(), "Smith");
}

#[test]
fn appointment_keeps_patient_and_normalizes_status() {
    let mut appointment = Appointment::from_record(&record(json!({
        "patient_id": "11111111-2222-4333-8444-555555555555",
        "doctor_id": "66666666-7777-4888-9999-000000000000",
        "appointment_date": "2025-03-01 09:30:00",
        "status": " Scheduled "
    })))
    .unwrap();
    assert_eq!(appointment.status(), AppointmentStatus::Scheduled);

    assert!(!appointment
        .apply_field("patient_id", &json!("someone-else"))
        .unwrap());
    assert!(appointment
        .apply_field("status", &json!("completed"))
        .unwrap());

    let stored = appointment.to_record();
    assert_eq!(stored["patient_id"], json!("11111111-2222-4333-8444-555555555555"));
    assert_eq!(stored["status"], json!("completed"));
    assert_eq!(stored["appointment_date"], json!("2025-03-01 09:30:00"));
}

#[test]
fn medical_record_lists_round_trip() {
    let medical = MedicalRecord::from_record(&record(json!({
        "patient_id": "11111111-2222-4333-8444-555555555555",
        "recorded_by": "66666666-7777-4888-9999-000000000000",
        "diagnosis": ["Malaria", "Anaemia"],
        "prescriptions": [],
        "treatment_date": "2025-03-01 09:30:00",
        "doctor_notes": "Review in two weeks"
    })))
    .unwrap();

    assert_eq!(medical.diagnosis(), ["Malaria", "Anaemia"]);
    assert!(medical.prescriptions().is_empty());
    assert_eq!(
        MedicalRecord::from_record(&medical.to_record()).unwrap(),
        medical
    );
}

#[test]
fn unknown_gender_is_invalid_field() {
    let mut data = patient_record();
    data.insert("gender".into(), json!("other"));

    assert!(matches!(
        Patient::from_record(&data),
        Err(ModelError::InvalidField { .. })
    ));
}
