//! Medical record domain model.
//!
//! # Invariants
//! - `patient_id` and `recorded_by` are fixed at creation.

use super::datetime::datetime_value;
use super::fields;
use super::{Entity, ModelResult, RecordMeta};
use crate::store::Record;
use chrono::NaiveDateTime;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalRecord {
    meta: RecordMeta,
    patient_id: String,
    recorded_by: String,
    diagnosis: Vec<String>,
    prescriptions: Vec<String>,
    treatment_date: NaiveDateTime,
    doctor_notes: String,
}

impl MedicalRecord {
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Id of the doctor who wrote the record.
    pub fn recorded_by(&self) -> &str {
        &self.recorded_by
    }

    pub fn diagnosis(&self) -> &[String] {
        &self.diagnosis
    }

    pub fn prescriptions(&self) -> &[String] {
        &self.prescriptions
    }

    pub fn treatment_date(&self) -> NaiveDateTime {
        self.treatment_date
    }

    pub fn doctor_notes(&self) -> &str {
        &self.doctor_notes
    }

    pub fn set_diagnosis(&mut self, value: Vec<String>) {
        self.diagnosis = value;
    }

    pub fn set_prescriptions(&mut self, value: Vec<String>) {
        self.prescriptions = value;
    }

    pub fn set_treatment_date(&mut self, value: NaiveDateTime) {
        self.treatment_date = value;
    }

    pub fn set_doctor_notes(&mut self, value: impl Into<String>) {
        self.doctor_notes = value.into();
    }
}

impl Entity for MedicalRecord {
    const LABEL: &'static str = "Medical record";
    const COLLECTION: &'static str = "medical_records";
    const FILTER_FIELDS: &'static [&'static str] = &["patient_id", "recorded_by", "treatment_date"];
    const SORT_FIELDS: &'static [&'static str] = &["treatment_date", "date_created"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.meta.write_id(&mut record);
        record.insert("patient_id".into(), Value::String(self.patient_id.clone()));
        record.insert("recorded_by".into(), Value::String(self.recorded_by.clone()));
        record.insert("diagnosis".into(), fields::string_list_value(&self.diagnosis));
        record.insert(
            "prescriptions".into(),
            fields::string_list_value(&self.prescriptions),
        );
        record.insert(
            "treatment_date".into(),
            datetime_value(Some(&self.treatment_date)),
        );
        record.insert("doctor_notes".into(), Value::String(self.doctor_notes.clone()));
        self.meta.write_dates(&mut record);
        record
    }

    fn from_record(record: &Record) -> ModelResult<Self> {
        Ok(Self {
            meta: RecordMeta::from_record(record)?,
            patient_id: fields::required_string("patient_id", record.get("patient_id"))?,
            recorded_by: fields::required_string("recorded_by", record.get("recorded_by"))?,
            diagnosis: fields::string_list("diagnosis", record.get("diagnosis"))?,
            prescriptions: fields::string_list("prescriptions", record.get("prescriptions"))?,
            treatment_date: fields::required_date("treatment_date", record.get("treatment_date"))?,
            doctor_notes: fields::required_string("doctor_notes", record.get("doctor_notes"))?,
        })
    }

    fn apply_field(&mut self, field: &str, value: &Value) -> ModelResult<bool> {
        let value = Some(value);
        match field {
            "diagnosis" => self.set_diagnosis(fields::string_list(field, value)?),
            "prescriptions" => self.set_prescriptions(fields::string_list(field, value)?),
            "treatment_date" => self.set_treatment_date(fields::required_date(field, value)?),
            "doctor_notes" => self.set_doctor_notes(fields::required_string(field, value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}
