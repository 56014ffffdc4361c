use super::{Checker, EntitySchemas, Schema, ValidationError};
use crate::model::{Gender, Patient};
use crate::store::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Patient create input. Also used for full updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePatient {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub other_names: Option<String>,
    pub contact: String,
    pub emergency_contact: String,
    pub address: String,
    pub gender: String,
    pub age: u32,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

pub type UpdatePatient = CreatePatient;

impl Schema for CreatePatient {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();
        checker.min_length("first_name", &self.first_name, 2);
        checker.min_length("last_name", &self.last_name, 2);
        checker.min_length("contact", &self.contact, 7);
        checker.min_length("emergency_contact", &self.emergency_contact, 7);
        checker.min_length("address", &self.address, 2);
        checker.ensure(Gender::parse(&self.gender).is_some(), || {
            let allowed = Gender::ALL.map(Gender::as_str).join(", ");
            format!("gender: Gender must be either: {allowed}")
        });
        if let Some(date_of_birth) = &self.date_of_birth {
            checker.date("date_of_birth", date_of_birth);
        }
        checker.finish()
    }

    fn to_record(&self) -> Record {
        let gender = Gender::parse(&self.gender)
            .map(|gender| gender.as_str().to_string())
            .unwrap_or_else(|| self.gender.clone());

        let mut record = Record::new();
        record.insert("first_name".into(), Value::String(self.first_name.clone()));
        record.insert("last_name".into(), Value::String(self.last_name.clone()));
        record.insert(
            "other_names".into(),
            self.other_names.clone().map_or(Value::Null, Value::String),
        );
        record.insert("contact".into(), Value::String(self.contact.clone()));
        record.insert(
            "emergency_contact".into(),
            Value::String(self.emergency_contact.clone()),
        );
        record.insert("address".into(), Value::String(self.address.clone()));
        record.insert("gender".into(), Value::String(gender));
        record.insert("age".into(), Value::from(self.age));
        if let Some(date_of_birth) = &self.date_of_birth {
            record.insert("date_of_birth".into(), Value::String(date_of_birth.clone()));
        }
        record
    }
}

impl EntitySchemas for Patient {
    type Create = CreatePatient;
    type Update = UpdatePatient;
}
