//! Appointment domain model.
//!
//! # Invariants
//! - `patient_id` is fixed at creation; the doctor, date and status can move.

use super::datetime::datetime_value;
use super::fields;
use super::{Entity, ModelError, ModelResult, RecordMeta};
use crate::store::Record;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    meta: RecordMeta,
    patient_id: String,
    doctor_id: String,
    appointment_date: NaiveDateTime,
    status: AppointmentStatus,
}

impl Appointment {
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn appointment_date(&self) -> NaiveDateTime {
        self.appointment_date
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn set_doctor_id(&mut self, value: impl Into<String>) {
        self.doctor_id = value.into();
    }

    pub fn set_appointment_date(&mut self, value: NaiveDateTime) {
        self.appointment_date = value;
    }

    pub fn set_status(&mut self, value: AppointmentStatus) {
        self.status = value;
    }
}

impl Entity for Appointment {
    const LABEL: &'static str = "Appointment";
    const COLLECTION: &'static str = "appointments";
    const FILTER_FIELDS: &'static [&'static str] =
        &["patient_id", "doctor_id", "status", "appointment_date"];
    const SORT_FIELDS: &'static [&'static str] = &["appointment_date", "status", "date_created"];

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
        record.insert("doctor_id".into(), Value::String(self.doctor_id.clone()));
        record.insert(
            "appointment_date".into(),
            datetime_value(Some(&self.appointment_date)),
        );
        record.insert("status".into(), Value::String(self.status.as_str().to_string()));
        self.meta.write_dates(&mut record);
        record
    }

    fn from_record(record: &Record) -> ModelResult<Self> {
        Ok(Self {
            meta: RecordMeta::from_record(record)?,
            patient_id: fields::required_string("patient_id", record.get("patient_id"))?,
            doctor_id: fields::required_string("doctor_id", record.get("doctor_id"))?,
            appointment_date: fields::required_date(
                "appointment_date",
                record.get("appointment_date"),
            )?,
            status: parse_status(record.get("status"))?,
        })
    }

    fn apply_field(&mut self, field: &str, value: &Value) -> ModelResult<bool> {
        let value = Some(value);
        match field {
            "doctor_id" => self.set_doctor_id(fields::required_string(field, value)?),
            "appointment_date" => self.set_appointment_date(fields::required_date(field, value)?),
            "status" => self.set_status(parse_status(value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn parse_status(value: Option<&Value>) -> ModelResult<AppointmentStatus> {
    let text = fields::required_string("status", value)?;
    AppointmentStatus::parse(&text)
        .ok_or_else(|| ModelError::invalid("status", format!("unknown status `{text}`")))
}
