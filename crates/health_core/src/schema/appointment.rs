use super::{Checker, EntitySchemas, Schema, ValidationError};
use crate::model::{Appointment, AppointmentStatus};
use crate::store::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub patient_id: String,
    pub doctor_id: String,
    pub appointment_date: String,
    pub status: String,
}

/// Appointment update input; the patient cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAppointment {
    pub doctor_id: String,
    pub appointment_date: String,
    pub status: String,
}

impl Schema for CreateAppointment {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();
        checker.uuid_v4("patient_id", &self.patient_id);
        check_common(&mut checker, &self.doctor_id, &self.appointment_date, &self.status);
        checker.finish()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("patient_id".into(), Value::String(self.patient_id.clone()));
        write_common(&mut record, &self.doctor_id, &self.appointment_date, &self.status);
        record
    }
}

impl Schema for UpdateAppointment {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();
        check_common(&mut checker, &self.doctor_id, &self.appointment_date, &self.status);
        checker.finish()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        write_common(&mut record, &self.doctor_id, &self.appointment_date, &self.status);
        record
    }
}

impl EntitySchemas for Appointment {
    type Create = CreateAppointment;
    type Update = UpdateAppointment;
}

fn check_common(checker: &mut Checker, doctor_id: &str, appointment_date: &str, status: &str) {
    checker.uuid_v4("doctor_id", doctor_id);
    checker.date("appointment_date", appointment_date);
    checker.ensure(AppointmentStatus::parse(status).is_some(), || {
        let allowed = AppointmentStatus::ALL.map(AppointmentStatus::as_str).join(", ");
        format!("status: Invalid status. Expected one of: {allowed}")
    });
}

fn write_common(record: &mut Record, doctor_id: &str, appointment_date: &str, status: &str) {
    let status = AppointmentStatus::parse(status)
        .map(|status| status.as_str().to_string())
        .unwrap_or_else(|| status.to_string());
    record.insert("doctor_id".into(), Value::String(doctor_id.to_string()));
    record.insert(
        "appointment_date".into(),
        Value::String(appointment_date.to_string()),
    );
    record.insert("status".into(), Value::String(status));
}
