//! Liveness endpoint.

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::{error::ApiError, json::write_json, AppState, SystemInfo};

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    system_info: &'a SystemInfo,
}

/// GET /v1/healthcheck
pub async fn healthcheck(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = HealthResponse {
        status: "available",
        system_info: &state.system_info,
    };
    Ok(write_json(StatusCode::OK, &body, None)?)
}
