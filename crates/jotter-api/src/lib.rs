//! # jotter-api
//!
//! HTTP API for the jotter note service.
//!
//! [`build_router`] assembles the full request pipeline (panic containment,
//! request IDs, tracing, CORS, body limit, routes) around any
//! [`NoteRepository`], so the binary and the integration tests serve the
//! exact same stack.

pub mod config;
pub mod error;
pub mod handlers;
pub mod json;
pub mod middleware;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use jotter_core::NoteRepository;

use crate::config::Config;
use crate::json::MAX_BODY_BYTES;
use crate::middleware::MakeRequestUuidV7;

/// Environment label and version reported by the healthcheck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub system_info: Arc<SystemInfo>,
    /// Exact origins allowed to make cross-origin requests.
    pub trusted_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        system_info: SystemInfo,
        trusted_origins: Vec<String>,
    ) -> Self {
        Self {
            notes,
            system_info: Arc::new(system_info),
            trusted_origins: Arc::new(trusted_origins),
        }
    }

    pub fn from_config(notes: Arc<dyn NoteRepository>, config: &Config) -> Self {
        Self::new(
            notes,
            SystemInfo {
                environment: config.environment.clone(),
                version: config.version.clone(),
            },
            config.trusted_origins.clone(),
        )
    }
}

/// Routes without the middleware stack.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/healthcheck", get(handlers::healthcheck))
        .route("/v1/notes", post(handlers::create_note))
        .route(
            "/v1/notes/:id",
            get(handlers::show_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
}

/// Build the complete application router.
///
/// `extra` routes are merged in before the middleware is applied, so they
/// get the same treatment as the built-in ones.
pub fn build_router_with(state: AppState, extra: Router<AppState>) -> Router {
    routes()
        .merge(extra)
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(middleware::method_not_allowed))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // inside CORS so recovered 500s still carry Vary and the echoed origin
        .layer(CatchPanicLayer::custom(middleware::recover_panic))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::enable_cors,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    build_router_with(state, Router::new())
}
