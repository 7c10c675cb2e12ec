//! Panic containment.
//!
//! Installed through `tower_http::catch_panic::CatchPanicLayer::custom`, so a
//! panicking handler still answers with the standard 500 envelope. The
//! connection is marked for closing because the handler's state is unknown.

use std::any::Any;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{error::SERVER_ERROR_MESSAGE, json::write_json};

/// Build the response for a caught panic.
pub fn recover_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail: &str = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(subsystem = "api", panic = detail, "Handler panicked");

    let mut headers = HeaderMap::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));

    match write_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        &json!({ "error": SERVER_ERROR_MESSAGE }),
        Some(headers),
    ) {
        Ok(response) => response,
        Err(_) => {
            let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
            response
                .headers_mut()
                .insert(header::CONNECTION, HeaderValue::from_static("close"));
            response
        }
    }
}
