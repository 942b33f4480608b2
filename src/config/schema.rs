//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API mediator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Gateway routing behaviour (prefix, api-docs suffix, policies).
    pub gateway: RoutingConfig,

    /// CORS header synthesis.
    pub cors: CorsConfig,

    /// Error body rendering.
    pub errors: ErrorConfig,

    /// Backend definitions, in registry order.
    pub backends: Vec<BackendConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Buffered body limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Status returned when the path names an unknown backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendNotFoundPolicy {
    /// 400 Bad Request: the segment is client input.
    #[default]
    BadRequest,
    /// 404 Not Found.
    NotFound,
}

/// Gateway routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Fixed path segment all forwarding routes live under (no slashes).
    pub prefix: String,

    /// Path suffix that marks an API-description document.
    pub api_docs_suffix: String,

    /// Status policy for unknown backend names.
    pub backend_not_found: BackendNotFoundPolicy,

    /// Use `X-Forwarded-Proto` / `X-Forwarded-Host` when computing the gateway URL.
    pub trust_forwarded_headers: bool,

    /// Optional entry for the gateway's own API docs in swagger-config.
    pub self_docs_url: Option<String>,

    /// Display name for `self_docs_url`.
    pub self_docs_label: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            prefix: "mediator".to_string(),
            api_docs_suffix: "/api-docs".to_string(),
            backend_not_found: BackendNotFoundPolicy::default(),
            trust_forwarded_headers: false,
            self_docs_url: None,
            self_docs_label: "gateway".to_string(),
        }
    }
}

/// Where `Access-Control-Allow-Origin` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorsOriginMode {
    /// Echo the request's `Origin` header, `*` when absent.
    #[default]
    Echo,
    /// Always `*`.
    Wildcard,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub origin: CorsOriginMode,

    /// Remove every backend `Access-Control-*` header before merging our own.
    pub strip_backend_headers: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origin: CorsOriginMode::Echo,
            strip_backend_headers: true,
        }
    }
}

/// Error body configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ErrorConfig {
    /// Add `timestamp`, `status`, `error` and `path` to error bodies.
    pub detailed: bool,
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Stable backend identifier.
    pub name: String,

    /// Absolute base URL (e.g., "http://localhost:9001").
    pub url: String,

    /// Public routing segment when it differs from `name`.
    #[serde(default)]
    pub path: Option<String>,

    /// Display name for swagger-config.
    #[serde(default)]
    pub label: Option<String>,
}

/// Timeout configuration for backend calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (send + buffered response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Limits for fully buffered bodies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_request_body_bytes: usize,
    pub max_response_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 10 * 1024 * 1024, // 10MB
            max_response_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "api_mediator=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[backends]]
            name = "orders"
            url = "http://localhost:9001"
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.prefix, "mediator");
        assert_eq!(config.gateway.api_docs_suffix, "/api-docs");
        assert_eq!(config.gateway.backend_not_found, BackendNotFoundPolicy::BadRequest);
        assert_eq!(config.cors.origin, CorsOriginMode::Echo);
        assert!(config.cors.strip_backend_headers);
        assert_eq!(config.backends.len(), 1);
        assert!(config.backends[0].path.is_none());
    }

    #[test]
    fn test_policies_parse_snake_case() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [gateway]
            prefix = "proxy"
            backend_not_found = "not_found"

            [cors]
            origin = "wildcard"
            strip_backend_headers = false
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.prefix, "proxy");
        assert_eq!(config.gateway.backend_not_found, BackendNotFoundPolicy::NotFound);
        assert_eq!(config.cors.origin, CorsOriginMode::Wildcard);
        assert!(!config.cors.strip_backend_headers);
    }
}
