//! Origin-allowlist CORS.
//!
//! Only exact matches against the configured trusted origins receive CORS
//! headers. Trusted preflight requests are answered here with an empty 200;
//! everything else continues to the router.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::AppState;

pub const ALLOWED_METHODS: &str = "OPTIONS, GET, POST, PUT, DELETE";
pub const ALLOWED_HEADERS: &str = "Authorization, Content-Type";

/// True for `OPTIONS` carrying `Access-Control-Request-Method`.
pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Return the request origin if it is in `trusted`.
pub fn trusted_origin<'a>(headers: &'a HeaderMap, trusted: &[String]) -> Option<&'a HeaderValue> {
    let origin = headers.get(header::ORIGIN)?;
    let value = origin.to_str().ok()?;
    trusted.iter().any(|t| t == value).then_some(origin)
}

fn add_vary(headers: &mut HeaderMap, preflight: bool) {
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    if preflight {
        headers.append(
            header::VARY,
            HeaderValue::from_static("Access-Control-Request-Method"),
        );
        headers.append(
            header::VARY,
            HeaderValue::from_static("Access-Control-Request-Headers"),
        );
    }
}

pub async fn enable_cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let preflight = is_preflight(request.method(), request.headers());
    let origin = trusted_origin(request.headers(), &state.trusted_origins).cloned();

    if let (true, Some(origin)) = (preflight, origin.as_ref()) {
        debug!(subsystem = "api", component = "cors", ?origin, "Answering preflight");
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        add_vary(headers, true);
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    add_vary(headers, preflight);
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_trusted_origin_exact_match() {
        let trusted = vec!["http://localhost:3000".to_string()];

        let h = headers(&[(header::ORIGIN, "http://localhost:3000")]);
        assert_eq!(
            trusted_origin(&h, &trusted).map(|v| v.as_bytes()),
            Some(&b"http://localhost:3000"[..])
        );

        let h = headers(&[(header::ORIGIN, "http://localhost:3000/")]);
        assert!(trusted_origin(&h, &trusted).is_none());

        let h = headers(&[(header::ORIGIN, "http://evil.com")]);
        assert!(trusted_origin(&h, &trusted).is_none());

        assert!(trusted_origin(&HeaderMap::new(), &trusted).is_none());
    }

    #[test]
    fn test_is_preflight() {
        let h = headers(&[(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")]);
        assert!(is_preflight(&Method::OPTIONS, &h));
        assert!(!is_preflight(&Method::GET, &h));
        assert!(!is_preflight(&Method::OPTIONS, &HeaderMap::new()));
    }
}
