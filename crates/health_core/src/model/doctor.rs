//! Doctor domain model. All domain fields are mutable.

use super::fields;
use super::{Entity, ModelResult, RecordMeta};
use crate::store::Record;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    meta: RecordMeta,
    first_name: String,
    last_name: String,
    other_names: Option<String>,
    specialty: Option<String>,
    years_of_experience: u32,
    contact: String,
}

impl Doctor {
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn other_names(&self) -> Option<&str> {
        self.other_names.as_deref()
    }

    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    pub fn years_of_experience(&self) -> u32 {
        self.years_of_experience
    }

    pub fn contact(&self) -> &str {
        &self.contact
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

    pub fn set_specialty(&mut self, value: Option<String>) {
        self.specialty = value;
    }

    pub fn set_years_of_experience(&mut self, value: u32) {
        self.years_of_experience = value;
    }

    pub fn set_contact(&mut self, value: impl Into<String>) {
        self.contact = value.into();
    }
}

impl Entity for Doctor {
    const LABEL: &'static str = "Doctor";
    const COLLECTION: &'static str = "doctors";
    const FILTER_FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "specialty",
        "years_of_experience",
        "contact",
    ];
    const SORT_FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "years_of_experience",
        "date_created",
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
        record.insert("first_name".into(), Value::String(self.first_name.clone()));
        record.insert("last_name".into(), Value::String(self.last_name.clone()));
        record.insert(
            "other_names".into(),
            fields::optional_string_value(self.other_names.as_ref()),
        );
        record.insert(
            "specialty".into(),
            fields::optional_string_value(self.specialty.as_ref()),
        );
        record.insert(
            "years_of_experience".into(),
            Value::from(self.years_of_experience),
        );
        record.insert("contact".into(), Value::String(self.contact.clone()));
        self.meta.write_dates(&mut record);
        record
    }

    fn from_record(record: &Record) -> ModelResult<Self> {
        Ok(Self {
            meta: RecordMeta::from_record(record)?,
            first_name: fields::required_string("first_name", record.get("first_name"))?,
            last_name: fields::required_string("last_name", record.get("last_name"))?,
            other_names: fields::optional_string("other_names", record.get("other_names"))?,
            specialty: fields::optional_string("specialty", record.get("specialty"))?,
            years_of_experience: fields::required_u32(
                "years_of_experience",
                record.get("years_of_experience"),
            )?,
            contact: fields::required_string("contact", record.get("contact"))?,
        })
    }

    fn apply_field(&mut self, field: &str, value: &Value) -> ModelResult<bool> {
        let value = Some(value);
        match field {
            "first_name" => self.set_first_name(fields::required_string(field, value)?),
            "last_name" => self.set_last_name(fields::required_string(field, value)?),
            "other_names" => self.set_other_names(fields::optional_string(field, value)?),
            "specialty" => self.set_specialty(fields::optional_string(field, value)?),
            "years_of_experience" => {
                self.set_years_of_experience(fields::required_u32(field, value)?)
            }
            "contact" => self.set_contact(fields::required_string(field, value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}
