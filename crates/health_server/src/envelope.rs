//! Uniform JSON response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Body of every API response.
///
/// `status_code` mirrors the HTTP status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ResponseStatus,
    pub status_code: u16,
    pub message: String,
    pub data: Option<Value>,
    pub extras: Option<Value>,
}

impl ApiResponse {
    pub fn success(status_code: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            status_code,
            message: message.into(),
            data: Some(data),
            extras: None,
        }
    }

    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            status_code,
            message: message.into(),
            data: None,
            extras: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::ApiResponse;
    use serde_json::json;

    #[test]
    fn serializes_all_envelope_keys() {
        let body = serde_json::to_value(ApiResponse::error(404, "Record not found: x")).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "error",
                "status_code": 404,
                "message": "Record not found: x",
                "data": null,
                "extras": null
            })
        );
    }
}
