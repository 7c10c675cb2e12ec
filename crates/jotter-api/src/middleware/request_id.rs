//! Request correlation IDs.

use axum::http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically in logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_v7_and_distinct() {
        let request = Request::new(());
        let mut make = MakeRequestUuidV7;
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();

        let a = Uuid::parse_str(a.header_value().to_str().unwrap()).unwrap();
        let b = Uuid::parse_str(b.header_value().to_str().unwrap()).unwrap();
        assert_eq!(a.get_version_num(), 7);
        assert_ne!(a, b);
    }
}
