//! HTTP-facing error taxonomy.
//!
//! Handlers return `Result<Response, ApiError>`; the conversion below picks
//! the status code and writes the `{"error": ...}` envelope.

use std::collections::BTreeMap;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::json::{write_json, DecodeError};

pub const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
pub const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";
pub const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug)]
pub enum ApiError {
    /// 400 with the decode defect as message.
    BadRequest(String),
    /// 404 for unmatched routes, invalid ids and missing records.
    NotFound,
    /// 405 for a known path with an unsupported method.
    MethodNotAllowed(Method),
    /// 409 when the note changed since the client read it.
    EditConflict,
    /// 422 with one message per field.
    FailedValidation(BTreeMap<String, String>),
    /// 500; the detail is logged, never returned.
    Internal(jotter_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<jotter_core::Error> for ApiError {
    fn from(err: jotter_core::Error) -> Self {
        match err {
            jotter_core::Error::NotFound => ApiError::NotFound,
            jotter_core::Error::EditConflict => ApiError::EditConflict,
            other => ApiError::Internal(other),
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) => {
                debug!(subsystem = "api", %message, "Rejected malformed request body");
                json!({ "error": message })
            }
            ApiError::NotFound => json!({ "error": NOT_FOUND_MESSAGE }),
            ApiError::MethodNotAllowed(method) => json!({
                "error": format!("the {} method is not supported for this resource", method)
            }),
            ApiError::EditConflict => {
                warn!(subsystem = "api", "Edit conflict on update");
                json!({ "error": EDIT_CONFLICT_MESSAGE })
            }
            ApiError::FailedValidation(errors) => {
                debug!(subsystem = "api", fields = errors.len(), "Validation failed");
                json!({ "error": errors })
            }
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                json!({ "error": SERVER_ERROR_MESSAGE })
            }
        };

        match write_json(status, &body, None) {
            Ok(response) => response,
            Err(err) => {
                error!(subsystem = "api", error = %err, "Failed to encode error response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
