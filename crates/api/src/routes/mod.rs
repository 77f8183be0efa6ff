//! API route definitions.

use axum::{Router, body::Bytes, extract::rejection::BytesRejection, http::StatusCode};
use serde_json::{Map, Value};

use crate::{AppState, error::ApiError};

pub mod estimate;
pub mod health;
pub mod leads;
pub mod uploads;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(estimate::routes())
        .merge(leads::routes())
        .merge(uploads::routes())
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Parses a JSON object. Empty, invalid and non-object input is `None`.
pub(crate) fn json_object(raw: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Reads the request body as a JSON object, leniently.
///
/// Only an oversized body is an error.
pub(crate) fn read_json_object(
    body: Result<Bytes, BytesRejection>,
) -> Result<Option<Map<String, Value>>, ApiError> {
    match body {
        Ok(bytes) => Ok(json_object(&bytes)),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::too_large("File too large"))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"".as_slice(), false)]
    #[case(b"not json".as_slice(), false)]
    #[case(b"[1, 2]".as_slice(), false)]
    #[case(b"\"text\"".as_slice(), false)]
    #[case(b"{}".as_slice(), true)]
    #[case(br#"{"name": "Asha"}"#.as_slice(), true)]
    fn test_json_object(#[case] raw: &[u8], #[case] is_object: bool) {
        assert_eq!(json_object(raw).is_some(), is_object);
    }
}
