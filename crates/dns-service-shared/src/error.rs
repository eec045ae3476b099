//! Web-layer error taxonomy and the JSON error envelope.
//!
//! Every failure a handler can report to a client is a [`WebError`]. The
//! formatter ([`crate::respond_error`]) is the only place that renders one
//! into a status code and an [`ErrorResponse`] body:
//!
//! | Kind | Status | Body |
//! |------|--------|------|
//! | [`WebError::Decode`] | 400 | `{"error":"malformed request data"}` |
//! | [`WebError::Validation`] | 422 | `{"error":"validation error","fields":[...]}` |
//! | [`WebError::Request`] | caller supplied | `{"error":"<message>"}` |
//! | [`WebError::Internal`] | 500 | `{"error":"Internal Server Error"}` |
//!
//! [`HandlerError`] is different: it is an error that escaped the formatter
//! (for example a body that could not be serialized) and is handled by the
//! dispatcher rather than rendered by the handler.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dns_lib::Error as LibError;

/// Message returned for malformed request bodies.
pub const MSG_MALFORMED: &str = "malformed request data";

/// Message returned when required fields are missing.
pub const MSG_VALIDATION: &str = "validation error";

/// Message returned for unclassified failures.
pub const MSG_INTERNAL: &str = "Internal Server Error";

/// An error with a specific request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// JSON name of the offending field.
    pub field: String,
    /// Human-readable reason.
    pub error: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }

    /// Error for a required field that was absent from the payload.
    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{} is a required field", field))
    }
}

/// JSON envelope for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = fields;
        self
    }
}

/// Errors that handlers report to clients.
#[derive(Debug, Error)]
pub enum WebError {
    /// The request body could not be parsed into the expected shape.
    #[error("malformed request data: {reason}")]
    Decode { reason: String },

    /// The body parsed, but required fields were missing.
    #[error("validation error: {} field(s) failed", .fields.len())]
    Validation { fields: Vec<FieldError> },

    /// A classified failure carrying its own status and client message.
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    /// Anything else. Never shown to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WebError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn request(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Decode { .. } => StatusCode::BAD_REQUEST,
            WebError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Request { status, .. } => *status,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing envelope for this error.
    ///
    /// Only [`WebError::Validation`] exposes field detail; decode and
    /// internal failures use fixed messages.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            WebError::Decode { .. } => ErrorResponse::new(MSG_MALFORMED),
            WebError::Validation { fields } => {
                ErrorResponse::new(MSG_VALIDATION).with_fields(fields.clone())
            }
            WebError::Request { message, .. } => ErrorResponse::new(message.clone()),
            WebError::Internal(_) => ErrorResponse::new(MSG_INTERNAL),
        }
    }
}

/// Convert library errors into client-facing web errors.
impl From<LibError> for WebError {
    fn from(error: LibError) -> Self {
        match error {
            LibError::UnknownSystemType => {
                WebError::request(StatusCode::BAD_REQUEST, error.to_string())
            }
            LibError::LocationOutOfRange => {
                WebError::request(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
            }
        }
    }
}

/// Errors that escape a handler and are handled by the dispatcher.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The response body could not be serialized.
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The HTTP response could not be assembled.
    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),

    /// A middleware refused to let the request through.
    #[error("middleware {middleware} rejected request: {reason}")]
    Rejected {
        middleware: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_hides_reason_from_client() {
        let err = WebError::decode("invalid digit found in string at line 1");
        let body = err.to_response();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body.error, MSG_MALFORMED);
        assert!(body.fields.is_empty());
    }

    #[test]
    fn validation_error_exposes_fields() {
        let err = WebError::Validation {
            fields: vec![FieldError::required("y"), FieldError::required("vel")],
        };
        let body = err.to_response();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, MSG_VALIDATION);
        assert_eq!(body.fields.len(), 2);
        assert_eq!(body.fields[0].field, "y");
        assert_eq!(body.fields[1].error, "vel is a required field");
    }

    #[test]
    fn internal_error_uses_generic_message() {
        let err = WebError::from(anyhow::anyhow!("database password is hunter2"));
        let body = err.to_response();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
        assert!(!serde_json::to_string(&body).unwrap().contains("hunter2"));
    }

    #[test]
    fn unknown_system_type_maps_to_bad_request() {
        let err = WebError::from(LibError::UnknownSystemType);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_response().error,
            "invalid system type: requires 'drone', 'ship' or 'ultradrone'"
        );
    }

    #[test]
    fn out_of_range_location_is_unprocessable() {
        let err = WebError::from(LibError::LocationOutOfRange);

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_response().fields.is_empty());
        assert!(err.to_response().error.starts_with("location out of range"));
    }

    #[test]
    fn empty_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&ErrorResponse::new(MSG_MALFORMED)).unwrap();
        assert_eq!(json, r#"{"error":"malformed request data"}"#);
    }

    #[test]
    fn fields_serialize_with_field_and_error_keys() {
        let body = ErrorResponse::new(MSG_VALIDATION).with_fields(vec![FieldError::required("x")]);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["fields"][0]["field"], "x");
        assert_eq!(json["fields"][0]["error"], "x is a required field");
    }
}
