use crate::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use osint_admin_core::ErrorKind;
use osint_admin_core::wire::{API_KEY_HEADER, ApiEnvelope, ErrorBody};

fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Byte comparison that does not stop at the first mismatch.
fn keys_match(provided: &str, expected: &str) -> bool {
    let (a, b) = (provided.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let authorized = extract_api_key(req.headers()).is_some_and(|key| keys_match(key, &state.api_key));
    if !authorized {
        tracing::warn!(path = %req.uri().path(), "Rejected request with missing or invalid API key");
        let body = ApiEnvelope::<()> {
            ok: false,
            data: None,
            error: Some(ErrorBody {
                kind: ErrorKind::Unauthorized,
                message: "missing or invalid API key".to_string(),
                user_id: None,
            }),
        };
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn key_comparison() {
        assert!(keys_match("s3cret", "s3cret"));
        assert!(!keys_match("s3cret", "s3cres"));
        assert!(!keys_match("s3cret", "s3cret-longer"));
        assert!(!keys_match("", "s3cret"));
    }

    #[test]
    fn blank_header_counts_as_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_api_key(&headers), None);
        headers.insert("x-api-key", HeaderValue::from_static("   "));
        assert_eq!(extract_api_key(&headers), None);
        headers.insert("x-api-key", HeaderValue::from_static(" abc "));
        assert_eq!(extract_api_key(&headers), Some("abc"));
    }
}
