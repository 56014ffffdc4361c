use health_core::schema::{
    CreateAppointment, CreateDoctor, CreateMedicalRecord, CreatePatient, Schema,
    UpdateMedicalRecord,
};
use serde_json::json;

const PATIENT_ID: &str = "11111111-2222-4333-8444-555555555555";
const DOCTOR_ID: &str = "66666666-7777-4888-9999-000000000000";

fn patient_json() -> serde_json::Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "contact": "0244000000",
        "emergency_contact": "0244111111",
        "address": "12 Ring Road",
        "gender": " FEMALE ",
        "age": 40
    })
}

#[test]
fn valid_patient_input_normalizes_gender() {
    let input: CreatePatient = serde_json::from_value(patient_json()).unwrap();
    input.validate().unwrap();

    let record = input.to_record();
    assert_eq!(record["gender"], json!("female"));
    assert_eq!(record["other_names"], json!(null));
    assert!(!record.contains_key("date_of_birth"));
}

#[test]
fn patient_issues_are_collected_together() {
    let mut body = patient_json();
    body["first_name"] = json!("J");
    body["contact"] = json!("024");
    body["gender"] = json!("unknown");
    body["date_of_birth"] = json!("15/06/1990");
    let input: CreatePatient = serde_json::from_value(body).unwrap();

    let err = input.validate().unwrap_err();
    assert_eq!(
        err.issues(),
        [
            "first_name: String should have at least 2 characters",
            "contact: String should have at least 7 characters",
            "gender: Gender must be either: male, female",
            "date_of_birth: Invalid date format. Expected format: YYYY-MM-DD HH:MM:SS",
        ]
    );
    assert!(err.to_string().starts_with("Invalid data: [first_name:"));
}

#[test]
fn negative_age_is_rejected_at_decode_time() {
    let mut body = patient_json();
    body["age"] = json!(-1);

    assert!(serde_json::from_value::<CreatePatient>(body).is_err());
}

#[test]
fn doctor_specialty_needs_two_characters() {
    let input: CreateDoctor = serde_json::from_value(json!({
        "first_name": "Ama",
        "last_name": "Mensah",
        "contact": "0200000000",
        "specialty": "X",
        "years_of_experience": 3
    }))
    .unwrap();

    let err = input.validate().unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert!(err.issues()[0].starts_with("specialty:"));
}

#[test]
fn appointment_ids_must_be_canonical_uuid_v4() {
    let input = CreateAppointment {
        patient_id: "not-an-id".to_string(),
        doctor_id: "AAAAAAAA-7777-4888-9999-00000000000B".to_string(),
        appointment_date: "2025-03-01 09:30:00".to_string(),
        status: "postponed".to_string(),
    };

    let err = input.validate().unwrap_err();
    assert_eq!(
        err.issues(),
        [
            "patient_id: Invalid id format.",
            "doctor_id: Invalid id format.",
            "status: Invalid status. Expected one of: scheduled, completed, cancelled",
        ]
    );
}

#[test]
fn appointment_doctor_id_must_be_version_four() {
    let input = CreateAppointment {
        patient_id: PATIENT_ID.to_string(),
        doctor_id: "66666666-7777-1888-9999-000000000000".to_string(),
        appointment_date: "2025-03-01 09:30:00".to_string(),
        status: "scheduled".to_string(),
    };

    let err = input.validate().unwrap_err();
    assert_eq!(err.issues(), ["doctor_id: Invalid id format."]);
}

#[test]
fn appointment_record_normalizes_status() {
    let input = CreateAppointment {
        patient_id: PATIENT_ID.to_string(),
        doctor_id: DOCTOR_ID.to_string(),
        appointment_date: "2025-03-01 09:30:00".to_string(),
        status: "Completed".to_string(),
    };

    input.validate().unwrap();
    assert_eq!(input.to_record()["status"], json!("completed"));
}

#[test]
fn medical_record_entries_need_three_characters() {
    let input = CreateMedicalRecord {
        patient_id: PATIENT_ID.to_string(),
        recorded_by: DOCTOR_ID.to_string(),
        diagnosis: vec!["Flu".to_string(), "ab".to_string()],
        prescriptions: Vec::new(),
        treatment_date: "2025-03-01 09:30:00".to_string(),
        doctor_notes: "Rest".to_string(),
    };

    let err = input.validate().unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert!(err.issues()[0].starts_with("diagnosis:"));
}

#[test]
fn medical_record_update_carries_only_clinical_fields() {
    let input: UpdateMedicalRecord = serde_json::from_value(json!({
        "diagnosis": ["Malaria"],
        "prescriptions": ["Artemether"],
        "treatment_date": "2025-03-01 09:30:00",
        "doctor_notes": "Follow up",
        "patient_id": PATIENT_ID
    }))
    .unwrap();

    input.validate().unwrap();
    let record = input.to_record();
    assert!(!record.contains_key("patient_id"));
    assert!(!record.contains_key("recorded_by"));
    assert_eq!(record["diagnosis"], json!(["Malaria"]));
}
