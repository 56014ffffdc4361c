use super::{Checker, EntitySchemas, Schema, ValidationError};
use crate::model::Doctor;
use crate::store::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDoctor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub other_names: Option<String>,
    pub contact: String,
    pub specialty: String,
    pub years_of_experience: u32,
}

pub type UpdateDoctor = CreateDoctor;

impl Schema for CreateDoctor {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();
        checker.min_length("first_name", &self.first_name, 2);
        checker.min_length("last_name", &self.last_name, 2);
        checker.min_length("contact", &self.contact, 7);
        checker.min_length("specialty", &self.specialty, 2);
        checker.finish()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("first_name".into(), Value::String(self.first_name.clone()));
        record.insert("last_name".into(), Value::String(self.last_name.clone()));
        record.insert(
            "other_names".into(),
            self.other_names.clone().map_or(Value::Null, Value::String),
        );
        record.insert("contact".into(), Value::String(self.contact.clone()));
        record.insert("specialty".into(), Value::String(self.specialty.clone()));
        record.insert(
            "years_of_experience".into(),
            Value::from(self.years_of_experience),
        );
        record
    }
}

impl EntitySchemas for Doctor {
    type Create = CreateDoctor;
    type Update = UpdateDoctor;
}
