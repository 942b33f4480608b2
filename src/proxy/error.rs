//! Error taxonomy and status mapping.
//!
//! Every failure while resolving a backend or talking to it ends up as a
//! [`GatewayError`], which maps deterministically to an HTTP status and a
//! client-facing message.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::BackendNotFoundPolicy;

/// Failures raised by a [`Transport`](crate::proxy::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend refused or could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No complete response before the deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid backend uri: {0}")]
    InvalidUri(String),

    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("request failed: {0}")]
    Request(String),
}

/// Request-level failures, rendered as JSON error responses.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    #[error("cannot connect to backend")]
    Connect,

    #[error("connection timed out")]
    Timeout,

    #[error("proxy error: {0}")]
    Upstream(String),

    #[error("no route for {0}")]
    NoRoute(String),

    /// `allow` is the value of the response's `Allow` header.
    #[error("method not allowed: {method}")]
    MethodNotAllowed { method: String, allow: &'static str },

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    InvalidRequestBody(String),
}

impl GatewayError {
    /// Status mapping with an explicit backend-not-found policy.
    pub fn status_with(&self, not_found: BackendNotFoundPolicy) -> StatusCode {
        match self {
            GatewayError::BackendNotFound(_) => match not_found {
                BackendNotFoundPolicy::BadRequest => StatusCode::BAD_REQUEST,
                BackendNotFoundPolicy::NotFound => StatusCode::NOT_FOUND,
            },
            GatewayError::Connect => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::NoRoute(_) => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl GatewayError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::BackendNotFound(_) => "backend_not_found",
            GatewayError::Connect => "connect",
            GatewayError::Timeout => "timeout",
            GatewayError::Upstream(_) => "upstream",
            GatewayError::NoRoute(_) => "no_route",
            GatewayError::MethodNotAllowed { .. } => "method_not_allowed",
            GatewayError::PayloadTooLarge { .. } => "payload_too_large",
            GatewayError::InvalidRequestBody(_) => "invalid_body",
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Connect(_) => GatewayError::Connect,
            TransportError::Timeout(_) => GatewayError::Timeout,
            other => GatewayError::Upstream(other.to_string()),
        }
    }
}
