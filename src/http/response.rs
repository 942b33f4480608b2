//! Response rendering.
//!
//! # Responsibilities
//! - Carry the engine's final status, headers and body to the client
//! - Render gateway errors as JSON bodies
//!
//! # Design Decisions
//! - Error bodies are `{"code", "message"}`; the detailed variant adds
//!   `timestamp`, `status`, `error` and `path`
//! - The body length is set by the server from the buffered bytes

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final response produced for one inbound request.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with `Content-Type: application/json`.
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let body = match serde_json::to_vec(value) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                Bytes::from_static(br#"{"code":502,"message":"proxy error"}"#)
            }
        };
        Self::new(status, headers, body)
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Reason phrase of `status`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            timestamp: None,
            status: None,
            error: None,
            path: None,
        }
    }

    /// Add the timestamp, status, reason phrase and request path.
    pub fn detailed(mut self, status: StatusCode, path: &str) -> Self {
        self.timestamp = Some(Utc::now());
        self.status = Some(status.as_u16());
        self.error = status.canonical_reason().map(str::to_string);
        self.path = Some(path.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_minimal_error_body() {
        let body = ErrorBody::new(StatusCode::SERVICE_UNAVAILABLE, "cannot connect to backend");
        let json: Value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": 503, "message": "cannot connect to backend"})
        );
    }

    #[test]
    fn test_detailed_error_body() {
        let body = ErrorBody::new(StatusCode::BAD_REQUEST, "Backend not found: x")
            .detailed(StatusCode::BAD_REQUEST, "/mediator/x/items");
        let json: Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 400);
        assert_eq!(json["status"], 400);
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["path"], "/mediator/x/items");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_json_response_sets_content_type() {
        let response = GatewayResponse::json(StatusCode::OK, &serde_json::json!({"ok": true}));
        assert_eq!(
            response.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(&response.body[..], br#"{"ok":true}"#);
    }

    #[test]
    fn test_into_response_keeps_status_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-backend", HeaderValue::from_static("orders"));
        let response = GatewayResponse::new(StatusCode::CREATED, headers, Bytes::from_static(b"ok"))
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get("x-backend").unwrap(), "orders");
    }
}
