//! Strict JSON request decoding and response encoding.
//!
//! Every response body written here is compact JSON followed by a single
//! newline. Decoding accepts exactly one JSON value of at most
//! [`MAX_BODY_BYTES`], rejects unknown keys, and turns parser failures into
//! client-facing [`DecodeError`]s that never expose serde internals.

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{BytesRejection, FailedToBufferBody},
        FromRequest, Request,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{error::Category, Map, Value};
use thiserror::Error;

/// Maximum accepted request body (1 MiB).
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Why a request body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("body must not be empty")]
    Empty,

    #[error("body must not be larger than {0} bytes")]
    TooLarge(usize),

    #[error("body contains badly-formed JSON (at character {0})")]
    Syntax(usize),

    #[error("body contains badly-formed JSON")]
    UnexpectedEof,

    #[error("body contains incorrect JSON type for field \"{0}\"")]
    FieldType(String),

    #[error("body contains incorrect JSON type (at character {0})")]
    Type(usize),

    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),

    #[error("body contains duplicate key \"{0}\"")]
    DuplicateField(String),

    #[error("body must only contain a single JSON value")]
    TrailingData,

    #[error("body could not be read")]
    Unreadable,
}

/// Encode `data` as the response body.
///
/// Caller headers are merged first, then `Content-Type` is forced to
/// `application/json`. Nothing is built if serialization fails.
pub fn write_json<T>(
    status: StatusCode,
    data: &T,
    headers: Option<HeaderMap>,
) -> Result<Response, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut body = serde_json::to_vec(data)?;
    body.push(b'\n');

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    if let Some(headers) = headers {
        for (name, value) in headers.iter() {
            response_headers.append(name.clone(), value.clone());
        }
    }
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(response)
}

/// Buffer the request body and decode it strictly into `T`.
///
/// The size cap comes from the router's `DefaultBodyLimit`; exceeding it
/// yields [`DecodeError::TooLarge`].
pub async fn read_json<T>(request: Request) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    let bytes = Bytes::from_request(request, &())
        .await
        .map_err(|rejection| match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                DecodeError::TooLarge(MAX_BODY_BYTES)
            }
            _ => DecodeError::Unreadable,
        })?;

    decode(&bytes)
}

/// Decode an already buffered body.
pub fn decode<T>(body: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    if body.len() > MAX_BODY_BYTES {
        return Err(DecodeError::TooLarge(MAX_BODY_BYTES));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = T::deserialize(&mut de).map_err(|err| classify::<T>(&err, body))?;
    de.end().map_err(|_| DecodeError::TrailingData)?;

    Ok(value)
}

fn classify<T>(err: &serde_json::Error, body: &[u8]) -> DecodeError
where
    T: DeserializeOwned,
{
    match err.classify() {
        Category::Eof => DecodeError::UnexpectedEof,
        Category::Io => DecodeError::Unreadable,
        Category::Syntax => DecodeError::Syntax(byte_offset(body, err.line(), err.column())),
        Category::Data => {
            let message = err.to_string();
            if let Some(key) = quoted_name(&message, "unknown field `") {
                return DecodeError::UnknownField(key);
            }
            if let Some(key) = quoted_name(&message, "duplicate field `") {
                return DecodeError::DuplicateField(key);
            }
            if is_type_mismatch(&message) {
                if let Some(field) = mistyped_field::<T>(body) {
                    return DecodeError::FieldType(field);
                }
            }
            DecodeError::Type(byte_offset(body, err.line(), err.column()))
        }
    }
}

/// Translate serde_json's 1-based line/column into a byte offset.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    preceding + column
}

/// Extract `name` from serde messages like "unknown field `name`, expected ...".
fn quoted_name(message: &str, prefix: &str) -> Option<String> {
    let rest = message.strip_prefix(prefix)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

fn is_type_mismatch(message: &str) -> bool {
    message.starts_with("invalid type") || message.starts_with("invalid value")
}

/// Find the top-level key whose value alone reproduces a type mismatch.
///
/// Each key is decoded alone as a single-entry object, so only that key's
/// value is checked against `T`'s field type; missing-field errors are ignored.
fn mistyped_field<T>(body: &[u8]) -> Option<String>
where
    T: DeserializeOwned,
{
    let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) else {
        return None;
    };

    object.into_iter().find_map(|(key, value)| {
        let mut single = Map::new();
        single.insert(key.clone(), value);
        match T::deserialize(Value::Object(single)) {
            Err(err) if is_type_mismatch(&err.to_string()) => Some(key),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Input {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        tags: Option<Vec<String>>,
        #[serde(default)]
        archived: bool,
    }

    fn decode_input(body: &str) -> Result<Input, DecodeError> {
        decode::<Input>(body.as_bytes())
    }

    #[test]
    fn test_decode_valid() {
        let input = decode_input(r#"{"title":"t","tags":["a"],"archived":true}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("t"));
        assert_eq!(input.tags, Some(vec!["a".to_string()]));
        assert!(input.archived);
    }

    #[test]
    fn test_decode_allows_trailing_whitespace() {
        assert!(decode_input("{\"title\":\"t\"}\n  \n").is_ok());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_input(""), Err(DecodeError::Empty));
        assert_eq!(decode_input("  \n"), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_unknown_field() {
        assert_eq!(
            decode_input(r#"{"title":"t","colour":"red"}"#),
            Err(DecodeError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn test_decode_duplicate_field() {
        assert_eq!(
            decode_input(r#"{"title":"a","title":"b"}"#),
            Err(DecodeError::DuplicateField("title".to_string()))
        );
        assert_eq!(
            decode_input(r#"{"archived":true,"tags":[],"archived":false}"#),
            Err(DecodeError::DuplicateField("archived".to_string()))
        );
    }

    #[test]
    fn test_decode_two_values() {
        assert_eq!(
            decode_input(r#"{"title":"a"}{"title":"b"}"#),
            Err(DecodeError::TrailingData)
        );
        assert_eq!(
            decode_input(r#"{"title":"a"} :"#),
            Err(DecodeError::TrailingData)
        );
    }

    #[test]
    fn test_decode_syntax_error_reports_offset() {
        match decode_input(r#"{"title": "a",}"#) {
            Err(DecodeError::Syntax(offset)) => assert!(offset > 0),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(decode_input(r#"{"title": "a""#), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_wrong_type_names_field() {
        assert_eq!(
            decode_input(r#"{"title": 123}"#),
            Err(DecodeError::FieldType("title".to_string()))
        );
        assert_eq!(
            decode_input(r#"{"title": "ok", "tags": "not-a-list"}"#),
            Err(DecodeError::FieldType("tags".to_string()))
        );
    }

    #[test]
    fn test_decode_wrong_top_level_type() {
        assert!(matches!(decode_input("[1, 2]"), Err(DecodeError::Type(_))));
    }

    #[test]
    fn test_decode_too_large() {
        let body = format!(r#"{{"title":"{}"}}"#, "a".repeat(MAX_BODY_BYTES));
        assert_eq!(decode_input(&body), Err(DecodeError::TooLarge(MAX_BODY_BYTES)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(DecodeError::Empty.to_string(), "body must not be empty");
        assert_eq!(
            DecodeError::TooLarge(MAX_BODY_BYTES).to_string(),
            "body must not be larger than 1048576 bytes"
        );
        assert_eq!(
            DecodeError::UnknownField("x".into()).to_string(),
            "body contains unknown key \"x\""
        );
        assert_eq!(
            DecodeError::DuplicateField("x".into()).to_string(),
            "body contains duplicate key \"x\""
        );
        assert_eq!(
            DecodeError::Syntax(7).to_string(),
            "body contains badly-formed JSON (at character 7)"
        );
    }

    #[test]
    fn test_byte_offset_multiline() {
        let body = b"{\n  \"a\": ,\n}";
        assert_eq!(byte_offset(body, 1, 1), 1);
        assert_eq!(byte_offset(body, 2, 3), 5);
    }

    #[tokio::test]
    async fn test_write_json() {
        let mut extra = HeaderMap::new();
        extra.insert(header::LOCATION, HeaderValue::from_static("/v1/notes/1"));
        extra.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let response = write_json(
            StatusCode::CREATED,
            &serde_json::json!({"message": "hi"}),
            Some(extra),
        )
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/v1/notes/1");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers().get_all(header::CONTENT_TYPE).iter().count(), 1);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"message\":\"hi\"}\n");
    }
}
