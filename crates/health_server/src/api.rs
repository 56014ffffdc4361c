//! Transport-independent request dispatch.
//!
//! # Responsibility
//! - Route `/api/v1/<resource>[/<id>]` requests to the matching service.
//! - Decode JSON bodies into schema inputs.
//! - Wrap every outcome in an `ApiResponse`.
//!
//! # Invariants
//! - Each request binds its store fresh; no state is shared between requests.
//! - Only a successful save creates collection files or directories.
//! - Unknown routes are 404, unsupported methods on a known route are 405,
//!   undecodable bodies are 422.

use crate::envelope::ApiResponse;
use health_core::config::collection_path;
use health_core::{
    Appointment, Doctor, EntitySchemas, JsonFileStore, MedicalRecord, Patient, RecordService,
    Repository, ServiceError,
};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const API_PREFIX: &str = "/api/v1";

const FILTERS_PARAM: &str = "filters";
const SORT_PARAM: &str = "sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Patients,
    Doctors,
    Appointments,
    MedicalRecords,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Patients,
        Resource::Doctors,
        Resource::Appointments,
        Resource::MedicalRecords,
    ];

    /// URL path segment under the API prefix.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Doctors => "doctors",
            Self::Appointments => "appointments",
            Self::MedicalRecords => "medical-records",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.segment() == segment)
    }

    fn plural_label(self) -> &'static str {
        match self {
            Self::Patients => "Patients",
            Self::Doctors => "Doctors",
            Self::Appointments => "Appointments",
            Self::MedicalRecords => "Medical records",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    /// Decoded query pairs in request order; keys may repeat.
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: &Value) -> Self {
        self.body = body.to_string().into_bytes();
        self
    }

    fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Per-process dispatch settings.
#[derive(Debug, Clone)]
pub struct ApiContext {
    data_dir: PathBuf,
}

impl ApiContext {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Routes one request and always produces a response.
pub fn dispatch(context: &ApiContext, request: &ApiRequest) -> ApiResponse {
    let method = request.method.to_ascii_uppercase();
    let response = match route(&request.path) {
        None => ApiResponse::error(404, "Not Found"),
        Some((resource, id)) => match resource {
            Resource::Patients => handle::<Patient>(context, resource, &method, id, request),
            Resource::Doctors => handle::<Doctor>(context, resource, &method, id, request),
            Resource::Appointments => {
                handle::<Appointment>(context, resource, &method, id, request)
            }
            Resource::MedicalRecords => {
                handle::<MedicalRecord>(context, resource, &method, id, request)
            }
        },
    };

    info!(
        "event=api_request module=api status={} method={} path={} status_code={}",
        if response.is_success() { "ok" } else { "error" },
        method,
        request.path,
        response.status_code
    );
    response
}

fn route(path: &str) -> Option<(Resource, Option<&str>)> {
    let rest = path.strip_prefix(API_PREFIX)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    let segments: Vec<&str> = rest.split('/').filter(|part| !part.is_empty()).collect();
    match segments.as_slice() {
        [resource] => Some((Resource::from_segment(resource)?, None)),
        [resource, id] => Some((Resource::from_segment(resource)?, Some(*id))),
        _ => None,
    }
}

type Outcome = Result<(u16, String, Value), ServiceError>;

/// Use case selected by method and path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation<'a> {
    List,
    Get(&'a str),
    Create,
    Update(&'a str),
    Delete(&'a str),
    Restore(&'a str),
}

fn operation<'a>(method: &str, id: Option<&'a str>) -> Option<Operation<'a>> {
    match (method, id) {
        ("GET", None) => Some(Operation::List),
        ("GET", Some(id)) => Some(Operation::Get(id)),
        ("POST", None) => Some(Operation::Create),
        ("PUT", Some(id)) => Some(Operation::Update(id)),
        ("DELETE", Some(id)) => Some(Operation::Delete(id)),
        ("PATCH", Some(id)) => Some(Operation::Restore(id)),
        _ => None,
    }
}

fn handle<E: EntitySchemas>(
    context: &ApiContext,
    resource: Resource,
    method: &str,
    id: Option<&str>,
    request: &ApiRequest,
) -> ApiResponse {
    let Some(selected) = operation(method, id) else {
        return ApiResponse::error(405, "Method Not Allowed");
    };

    // Reads of a missing collection are empty; only a save creates the file.
    let store = JsonFileStore::new(collection_path(context.data_dir(), E::COLLECTION));
    let service = RecordService::<E, _>::new(Repository::new(store));
    let done = |verb: &str| format!("{} {verb} successfully.", E::LABEL);

    let outcome: Outcome = match selected {
        Operation::List => {
            let filters = request.query_values(FILTERS_PARAM);
            let sort = request.query_values(SORT_PARAM);
            service.get_all(filters.as_slice(), sort.as_slice()).map(|items| {
                let data = items.iter().map(entity_value).collect();
                (
                    200,
                    format!("{} retrieved successfully.", resource.plural_label()),
                    Value::Array(data),
                )
            })
        }
        Operation::Get(id) => service
            .get_by_id(id)
            .map(|entity| (200, done("retrieved"), entity_value(&entity))),
        Operation::Create => match decode::<E::Create>(&request.body) {
            Ok(input) => service
                .create(&input)
                .map(|entity| (201, done("created"), entity_value(&entity))),
            Err(response) => return response,
        },
        Operation::Update(id) => match decode::<E::Update>(&request.body) {
            Ok(input) => service
                .update(id, &input)
                .map(|entity| (200, done("updated"), entity_value(&entity))),
            Err(response) => return response,
        },
        Operation::Delete(id) => service
            .delete(id)
            .map(|entity| (200, done("deleted"), entity_value(&entity))),
        Operation::Restore(id) => service
            .restore(id)
            .map(|entity| (200, done("restored"), entity_value(&entity))),
    };

    match outcome {
        Ok((status_code, message, data)) => ApiResponse::success(status_code, message, data),
        Err(err) => {
            let status_code = err.status_code();
            if status_code >= 500 {
                error!(
                    "event=api_service module=api status=error collection={} error={}",
                    E::COLLECTION,
                    err
                );
            }
            ApiResponse::error(status_code, err.to_string())
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiResponse> {
    serde_json::from_slice(body).map_err(|err| {
        warn!("event=api_decode module=api status=error error={}", err);
        ApiResponse::error(422, format!("Invalid request body: {err}"))
    })
}

fn entity_value<E: EntitySchemas>(entity: &E) -> Value {
    Value::Object(entity.to_record())
}
