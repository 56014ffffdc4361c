//! Patient domain model.
//!
//! # Invariants
//! - `patient_number` is generated when absent.
//! - `age` is read-only: the supplied value wins, otherwise it is derived
//!   from `date_of_birth`. A patient with neither is rejected.

use super::datetime::datetime_value;
use super::fields;
use super::{Entity, ModelError, ModelResult, RecordMeta};
use crate::store::Record;
use chrono::{Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    meta: RecordMeta,
    patient_number: String,
    first_name: String,
    last_name: String,
    other_names: Option<String>,
    gender: Gender,
    contact: String,
    address: String,
    emergency_contact: String,
    date_of_birth: Option<NaiveDateTime>,
    age: u32,
}

impl Patient {
    pub fn patient_number(&self) -> &str {
        &self.patient_number
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn other_names(&self) -> Option<&str> {
        self.other_names.as_deref()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn emergency_contact(&self) -> &str {
        &self.emergency_contact
    }

    pub fn date_of_birth(&self) -> Option<NaiveDateTime> {
        self.date_of_birth
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn set_patient_number(&mut self, value: impl Into<String>) {
        self.patient_number = value.into();
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    pub fn set_other_names(&mut self, value: Option<String>) {
        self.other_names = value;
    }

    pub fn set_gender(&mut self, value: Gender) {
        self.gender = value;
    }

    pub fn set_contact(&mut self, value: impl Into<String>) {
        self.contact = value.into();
    }

    pub fn set_address(&mut self, value: impl Into<String>) {
        self.address = value.into();
    }

    pub fn set_emergency_contact(&mut self, value: impl Into<String>) {
        self.emergency_contact = value.into();
    }

    pub fn set_date_of_birth(&mut self, value: Option<NaiveDateTime>) {
        self.date_of_birth = value;
    }
}

impl Entity for Patient {
    const LABEL: &'static str = "Patient";
    const COLLECTION: &'static str = "patients";
    const FILTER_FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "other_names",
        "gender",
        "age",
        "patient_number",
        "contact",
    ];
    const SORT_FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "age",
        "date_created",
        "date_updated",
    ];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.meta.write_id(&mut record);
        record.insert("patient_number".into(), Value::String(self.patient_number.clone()));
        record.insert("first_name".into(), Value::String(self.first_name.clone()));
        record.insert("last_name".into(), Value::String(self.last_name.clone()));
        record.insert(
            "other_names".into(),
            fields::optional_string_value(self.other_names.as_ref()),
        );
        record.insert("gender".into(), Value::String(self.gender.as_str().to_string()));
        record.insert("contact".into(), Value::String(self.contact.clone()));
        record.insert("address".into(), Value::String(self.address.clone()));
        record.insert(
            "emergency_contact".into(),
            Value::String(self.emergency_contact.clone()),
        );
        record.insert(
            "date_of_birth".into(),
            datetime_value(self.date_of_birth.as_ref()),
        );
        record.insert("age".into(), Value::from(self.age));
        self.meta.write_dates(&mut record);
        record
    }

    fn from_record(record: &Record) -> ModelResult<Self> {
        let meta = RecordMeta::from_record(record)?;
        let date_of_birth = fields::optional_date("date_of_birth", record.get("date_of_birth"))?;
        let age = match fields::optional_u32("age", record.get("age"))? {
            Some(age) => age,
            None => derive_age(date_of_birth)?,
        };

        Ok(Self {
            meta,
            patient_number: fields::optional_string("patient_number", record.get("patient_number"))?
                .filter(|number| !number.is_empty())
                .unwrap_or_else(generate_patient_number),
            first_name: fields::required_string("first_name", record.get("first_name"))?,
            last_name: fields::required_string("last_name", record.get("last_name"))?,
            other_names: fields::optional_string("other_names", record.get("other_names"))?,
            gender: parse_gender(record.get("gender"))?,
            contact: fields::required_string("contact", record.get("contact"))?,
            address: fields::required_string("address", record.get("address"))?,
            emergency_contact: fields::required_string(
                "emergency_contact",
                record.get("emergency_contact"),
            )?,
            date_of_birth,
            age,
        })
    }

    fn apply_field(&mut self, field: &str, value: &Value) -> ModelResult<bool> {
        let value = Some(value);
        match field {
            "patient_number" => self.set_patient_number(fields::required_string(field, value)?),
            "first_name" => self.set_first_name(fields::required_string(field, value)?),
            "last_name" => self.set_last_name(fields::required_string(field, value)?),
            "other_names" => self.set_other_names(fields::optional_string(field, value)?),
            "gender" => self.set_gender(parse_gender(value)?),
            "contact" => self.set_contact(fields::required_string(field, value)?),
            "address" => self.set_address(fields::required_string(field, value)?),
            "emergency_contact" => {
                self.set_emergency_contact(fields::required_string(field, value)?)
            }
            "date_of_birth" => self.set_date_of_birth(fields::optional_date(field, value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn parse_gender(value: Option<&Value>) -> ModelResult<Gender> {
    let text = fields::required_string("gender", value)?;
    Gender::parse(&text)
        .ok_or_else(|| ModelError::invalid("gender", format!("unknown gender `{text}`")))
}

fn derive_age(date_of_birth: Option<NaiveDateTime>) -> ModelResult<u32> {
    let birth = date_of_birth.ok_or_else(|| ModelError::MissingField("age".to_string()))?;
    let years = Utc::now().year() - birth.year();
    Ok(u32::try_from(years).unwrap_or(0))
}

fn generate_patient_number() -> String {
    let now = Utc::now();
    format!("P-{}-{}", now.timestamp(), now.timestamp_subsec_micros())
}
