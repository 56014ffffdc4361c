use super::{Checker, EntitySchemas, Schema, ValidationError};
use crate::model::MedicalRecord;
use crate::store::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MIN_ENTRY_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMedicalRecord {
    pub patient_id: String,
    pub recorded_by: String,
    pub diagnosis: Vec<String>,
    pub prescriptions: Vec<String>,
    pub treatment_date: String,
    pub doctor_notes: String,
}

/// Medical record update input; patient and author are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMedicalRecord {
    pub diagnosis: Vec<String>,
    pub prescriptions: Vec<String>,
    pub treatment_date: String,
    pub doctor_notes: String,
}

impl Schema for CreateMedicalRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();
        checker.uuid_v4("patient_id", &self.patient_id);
        checker.uuid_v4("recorded_by", &self.recorded_by);
        check_clinical(&mut checker, self.clinical());
        checker.finish()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("patient_id".into(), Value::String(self.patient_id.clone()));
        record.insert("recorded_by".into(), Value::String(self.recorded_by.clone()));
        write_clinical(&mut record, self.clinical());
        record
    }
}

impl Schema for UpdateMedicalRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();
        check_clinical(&mut checker, self.clinical());
        checker.finish()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        write_clinical(&mut record, self.clinical());
        record
    }
}

impl EntitySchemas for MedicalRecord {
    type Create = CreateMedicalRecord;
    type Update = UpdateMedicalRecord;
}

struct ClinicalFields<'a> {
    diagnosis: &'a [String],
    prescriptions: &'a [String],
    treatment_date: &'a str,
    doctor_notes: &'a str,
}

impl CreateMedicalRecord {
    fn clinical(&self) -> ClinicalFields<'_> {
        ClinicalFields {
            diagnosis: &self.diagnosis,
            prescriptions: &self.prescriptions,
            treatment_date: &self.treatment_date,
            doctor_notes: &self.doctor_notes,
        }
    }
}

impl UpdateMedicalRecord {
    fn clinical(&self) -> ClinicalFields<'_> {
        ClinicalFields {
            diagnosis: &self.diagnosis,
            prescriptions: &self.prescriptions,
            treatment_date: &self.treatment_date,
            doctor_notes: &self.doctor_notes,
        }
    }
}

fn check_clinical(checker: &mut Checker, fields: ClinicalFields<'_>) {
    for (name, entries) in [
        ("diagnosis", fields.diagnosis),
        ("prescriptions", fields.prescriptions),
    ] {
        checker.ensure(
            entries
                .iter()
                .all(|entry| entry.chars().count() >= MIN_ENTRY_CHARS),
            || format!("{name}: every entry must be at least {MIN_ENTRY_CHARS} characters"),
        );
    }
    checker.date("treatment_date", fields.treatment_date);
    checker.min_length("doctor_notes", fields.doctor_notes, 2);
}

fn write_clinical(record: &mut Record, fields: ClinicalFields<'_>) {
    let list = |entries: &[String]| Value::Array(entries.iter().cloned().map(Value::String).collect());
    record.insert("diagnosis".into(), list(fields.diagnosis));
    record.insert("prescriptions".into(), list(fields.prescriptions));
    record.insert(
        "treatment_date".into(),
        Value::String(fields.treatment_date.to_string()),
    );
    record.insert(
        "doctor_notes".into(),
        Value::String(fields.doctor_notes.to_string()),
    );
}
