//! Error types for the portal API client.
//!
//! # Design
//! The four kinds callers act on are `Validation`, `NotFound`, `Network` and
//! `Server`. `Rejected` covers remaining 4xx answers (401, 403, 409) whose
//! body carries no field errors. Serialization failures are local bugs and
//! stay distinct from anything the server said.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;
use crate::validation::{FieldError, ValidationErrors};

/// Errors returned by resource operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Submitted fields failed declared constraints, client- or server-side.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The identifier does not exist or was soft-deleted.
    #[error("resource not found")]
    NotFound,

    /// Transport-level failure: timeout, DNS, connection refused.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered 5xx.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other 4xx answer.
    #[error("request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Only transport failures are worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Laravel-style error body: `{"message": "...", "errors": {"field": ["..."]}}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Map<String, Value>>,
}

/// Map a non-success status to the matching `ApiError`. 2xx passes through.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let status = response.status;
    if status == 404 {
        return Err(ApiError::NotFound);
    }
    let body: Option<ErrorBody> = serde_json::from_str(&response.body).ok();
    if status >= 500 {
        let message = body
            .and_then(|b| b.message)
            .unwrap_or_else(|| response.body.clone());
        return Err(ApiError::Server { status, message });
    }
    if status == 400 || status == 422 {
        if let Some(errors) = body.and_then(|b| b.errors).and_then(field_errors) {
            return Err(ApiError::Validation(errors));
        }
    }
    Err(ApiError::Rejected {
        status,
        body: response.body.clone(),
    })
}

fn field_errors(errors: serde_json::Map<String, Value>) -> Option<ValidationErrors> {
    let mut out = Vec::new();
    for (path, messages) in errors {
        match messages {
            Value::Array(items) => {
                for item in items {
                    if let Value::String(message) = item {
                        out.push(FieldError::new(path.clone(), message));
                    }
                }
            }
            Value::String(message) => out.push(FieldError::new(path, message)),
            _ => {}
        }
    }
    ValidationErrors::from_vec(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_passes() {
        assert!(check_status(&HttpResponse::new(201, "{}")).is_ok());
        assert!(check_status(&HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn not_found() {
        let err = check_status(&HttpResponse::new(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn field_error_body_becomes_validation() {
        let body = r#"{"message":"The given data was invalid.","errors":{"tanggal":["Tanggal sudah terdaftar"],"nama":["Nama wajib diisi","Nama terlalu pendek"]}}"#;
        let err = check_status(&HttpResponse::new(422, body)).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.field("tanggal"), Some("Tanggal sudah terdaftar"));
        assert_eq!(errors.field("nama"), Some("Nama wajib diisi"));
    }

    #[test]
    fn client_error_without_fields_is_rejected() {
        let err = check_status(&HttpResponse::new(403, r#"{"message":"Forbidden"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 403, .. }));
        let err = check_status(&HttpResponse::new(422, "oops")).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 422, .. }));
    }

    #[test]
    fn server_error_prefers_message_key() {
        let err = check_status(&HttpResponse::new(500, r#"{"message":"Server Error"}"#)).unwrap_err();
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server Error");
            }
            other => panic!("unexpected {other:?}"),
        }
        let err = check_status(&HttpResponse::new(502, "bad gateway")).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, ref message } if message == "bad gateway"));
        assert!(!err.is_retryable());
    }
}
