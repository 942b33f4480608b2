//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for tracing
//! - Capture the inbound request in a framework-independent shape
//! - Work out how the client addressed the gateway (scheme, host, port)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host and port come from the request itself, so rewritten documents are
//!   correct for whatever name the client used
//! - Forwarded headers are only honoured when configured

use std::net::SocketAddr;
use std::str::FromStr;

use axum::body::Bytes;
use axum::http::uri::Authority;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PORT: &str = "x-forwarded-port";

/// Generates `x-request-id` values for requests that lack one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID stamped by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Where the client reached the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrigin {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl GatewayOrigin {
    /// Derive the origin from the request URI and headers.
    ///
    /// Falls back to `local_addr` when neither the URI nor `Host` carry an
    /// authority.
    pub fn from_request(
        uri: &Uri,
        headers: &HeaderMap,
        local_addr: SocketAddr,
        trust_forwarded: bool,
    ) -> Self {
        let forwarded = |name: &str| {
            trust_forwarded
                .then(|| headers.get(name))
                .flatten()
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let scheme = forwarded(X_FORWARDED_PROTO)
            .or_else(|| uri.scheme_str())
            .unwrap_or("http")
            .to_ascii_lowercase();

        let authority = forwarded(X_FORWARDED_HOST)
            .and_then(|h| Authority::from_str(h).ok())
            .or_else(|| uri.authority().cloned())
            .or_else(|| {
                headers
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|h| Authority::from_str(h).ok())
            });

        let Some(authority) = authority else {
            return Self {
                scheme,
                host: local_addr.ip().to_string(),
                port: local_addr.port(),
            };
        };

        let port = authority
            .port_u16()
            .or_else(|| forwarded(X_FORWARDED_PORT).and_then(|p| p.parse().ok()))
            .unwrap_or_else(|| default_port(&scheme));

        Self {
            host: authority.host().to_string(),
            port,
            scheme,
        }
    }

    /// `{scheme}://{host}:{port}{base_path}`
    pub fn url(&self, base_path: &str) -> String {
        format!("{}://{}:{}{}", self.scheme, self.host, self.port, base_path)
    }
}

fn default_port(scheme: &str) -> u16 {
    if scheme == "https" {
        443
    } else {
        80
    }
}

/// A fully buffered inbound request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Raw (still percent-encoded) path.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub origin: GatewayOrigin,
}

impl InboundRequest {
    pub fn origin_header(&self) -> Option<&HeaderValue> {
        self.headers.get(header::ORIGIN)
    }
}
