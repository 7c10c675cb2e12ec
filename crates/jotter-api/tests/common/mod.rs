//! Shared helpers for the HTTP integration tests.
//!
//! Every test drives the real router built by `build_router` over an
//! in-memory repository, one request at a time through `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use jotter_api::{build_router, build_router_with, AppState, SystemInfo};
use jotter_db::{CreateNoteRequest, MemoryNoteRepository, Note, NoteRepository};

pub const TRUSTED_ORIGIN: &str = "http://localhost:3000";

pub struct TestApp {
    pub router: Router,
    pub notes: Arc<MemoryNoteRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn error(&self) -> Value {
        self.json()["error"].clone()
    }
}

pub fn state(notes: Arc<MemoryNoteRepository>) -> AppState {
    AppState::new(
        notes,
        SystemInfo {
            environment: "testing".to_string(),
            version: "1.0.0".to_string(),
        },
        vec![TRUSTED_ORIGIN.to_string()],
    )
}

impl TestApp {
    pub fn new() -> Self {
        let notes = Arc::new(MemoryNoteRepository::new());
        Self {
            router: build_router(state(notes.clone())),
            notes,
        }
    }

    /// App with additional routes behind the full middleware stack.
    pub fn with_routes(extra: Router<AppState>) -> Self {
        let notes = Arc::new(MemoryNoteRepository::new());
        Self {
            router: build_router_with(state(notes.clone()), extra),
            notes,
        }
    }

    pub async fn seed(&self, title: &str, body: &str, tags: &[&str]) -> Note {
        self.notes
            .insert(CreateNoteRequest {
                title: title.to_string(),
                body: body.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })
            .await
            .expect("seed insert")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}
