//! Route table for the gateway prefix.
//!
//! # Responsibilities
//! - Recognise `/{prefix}/swagger-config`
//! - Split `/{prefix}/{backend}/{*rest}` into the backend segment and the
//!   remaining path, preserved verbatim
//! - Return explicit no-match for anything outside the prefix
//!
//! # Design Decisions
//! - Independent of the web framework: operates on the raw path string
//! - `swagger-config` takes precedence over a backend with that name

/// Segment reserved for the aggregated API-doc listing.
pub const SWAGGER_CONFIG_SEGMENT: &str = "swagger-config";

/// Result of matching a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/{prefix}/swagger-config`
    SwaggerConfig,
    /// `/{prefix}/{backend}{rest}` where `rest` is empty or starts with `/`.
    Forward { backend: &'a str, rest: &'a str },
}

/// Matches paths under a fixed gateway prefix.
#[derive(Debug, Clone)]
pub struct GatewayRouter {
    /// `/{prefix}`
    root: String,
}

impl GatewayRouter {
    pub fn new(prefix: &str) -> Self {
        Self {
            root: format!("/{}", prefix.trim_matches('/')),
        }
    }

    /// `/{prefix}`
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Public base path of a backend: `/{prefix}/{segment}`.
    pub fn backend_base(&self, segment: &str) -> String {
        format!("{}/{}", self.root, segment)
    }

    /// Whether `path` is `/{prefix}/` or below, whatever follows.
    pub fn is_under_prefix(&self, path: &str) -> bool {
        path.strip_prefix(self.root.as_str())
            .is_some_and(|remainder| remainder.starts_with('/'))
    }

    /// Match a request path against the table.
    pub fn match_path<'a>(&self, path: &'a str) -> Option<Route<'a>> {
        let remainder = path.strip_prefix(self.root.as_str())?.strip_prefix('/')?;

        let (segment, rest) = match remainder.find('/') {
            Some(idx) => remainder.split_at(idx),
            None => (remainder, ""),
        };

        if segment.is_empty() {
            return None;
        }

        if segment == SWAGGER_CONFIG_SEGMENT && rest.is_empty() {
            return Some(Route::SwaggerConfig);
        }

        Some(Route::Forward {
            backend: segment,
            rest,
        })
    }
}
