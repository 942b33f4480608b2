//! CORS header synthesis.
//!
//! The gateway answers preflight requests itself and stamps the same fixed
//! header set on every other response, including errors.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderMap, HeaderValue};

use crate::config::CorsOriginMode;

pub const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type,Authorization";
pub const EXPOSE_HEADERS: &str = "*";
pub const MAX_AGE_SECS: &str = "3600";

/// Builds the gateway's CORS headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorsPolicy {
    origin: CorsOriginMode,
}

impl CorsPolicy {
    pub fn new(origin: CorsOriginMode) -> Self {
        Self { origin }
    }

    /// The five fixed CORS headers for a request carrying `origin`.
    pub fn headers(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let allow_origin = match (self.origin, origin) {
            (CorsOriginMode::Echo, Some(value)) => value.clone(),
            _ => HeaderValue::from_static("*"),
        };

        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSE_HEADERS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
        headers
    }

    /// Merge the CORS headers into `target`; ours replace any existing value.
    pub fn apply(&self, target: &mut HeaderMap, origin: Option<&HeaderValue>) {
        for (name, value) in self.headers(origin) {
            if let Some(name) = name {
                target.insert(name, value);
            }
        }
    }
}
