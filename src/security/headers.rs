//! Header filtering between client and backend.
//!
//! # Responsibilities
//! - Drop transport-framing headers from outbound requests
//! - Drop framing headers from backend responses (the body may be rewritten
//!   and the gateway re-frames it)
//! - Optionally drop backend `Access-Control-*` headers
//!
//! # Design Decisions
//! - Everything not on a deny list passes through, including `Authorization`
//! - Name comparison is case-insensitive
//! - Repeated headers keep every value

use axum::http::HeaderMap;

/// Never copied from the client to the backend.
pub const REQUEST_DENY_LIST: &[&str] = &["host", "content-length", "connection"];

/// Never copied from the backend to the client.
pub const RESPONSE_DENY_LIST: &[&str] = &[
    "content-length",
    "transfer-encoding",
    "content-encoding",
    "connection",
];

const CORS_HEADER_PREFIX: &str = "access-control-";

/// Return a copy of `headers` without any name on `deny_list`.
pub fn filter_headers(headers: &HeaderMap, deny_list: &[&str]) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if !is_denied(name.as_str(), deny_list) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

/// Headers to send to the backend.
pub fn outbound_headers(headers: &HeaderMap) -> HeaderMap {
    filter_headers(headers, REQUEST_DENY_LIST)
}

/// Headers to relay to the client.
pub fn inbound_headers(headers: &HeaderMap) -> HeaderMap {
    filter_headers(headers, RESPONSE_DENY_LIST)
}

/// Remove every `Access-Control-*` header.
pub fn strip_cors_headers(headers: &mut HeaderMap) {
    let cors: Vec<_> = headers
        .keys()
        .filter(|name| {
            name.as_str()
                .get(..CORS_HEADER_PREFIX.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(CORS_HEADER_PREFIX))
        })
        .cloned()
        .collect();
    for name in cors {
        headers.remove(&name);
    }
}

fn is_denied(name: &str, deny_list: &[&str]) -> bool {
    deny_list.iter().any(|d| name.eq_ignore_ascii_case(d))
}
