//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend URLs and routing segments
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Duplicate backend names are allowed; lookup is first-wins

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gateway.prefix must be a single non-empty path segment, got {0:?}")]
    InvalidPrefix(String),

    #[error("gateway.api_docs_suffix must start with '/', got {0:?}")]
    InvalidApiDocsSuffix(String),

    #[error("backends[{index}].name must not be empty")]
    EmptyBackendName { index: usize },

    #[error("backends[{index}] routing segment {segment:?} must be non-empty and contain no '/'")]
    InvalidRoutingSegment { index: usize, segment: String },

    #[error("backends[{index}].url {url:?} is not an absolute http URL: {reason}")]
    InvalidBackendUrl {
        index: usize,
        url: String,
        reason: String,
    },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.gateway.prefix;
    if prefix.is_empty() || prefix.contains('/') {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    }

    if !config.gateway.api_docs_suffix.starts_with('/') {
        errors.push(ValidationError::InvalidApiDocsSuffix(
            config.gateway.api_docs_suffix.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, backend) in config.backends.iter().enumerate() {
        if backend.name.is_empty() {
            errors.push(ValidationError::EmptyBackendName { index });
        }

        let segment = backend.path.as_deref().unwrap_or(&backend.name);
        let empty_alias = backend.path.is_some() && segment.is_empty();
        if empty_alias || segment.contains('/') {
            errors.push(ValidationError::InvalidRoutingSegment {
                index,
                segment: segment.to_string(),
            });
        }

        if let Err(reason) = check_backend_url(&backend.url) {
            errors.push(ValidationError::InvalidBackendUrl {
                index,
                url: backend.url.clone(),
                reason,
            });
        }

        if !segment.is_empty() && !seen.insert(segment) {
            tracing::warn!(
                segment = %segment,
                "Duplicate backend routing segment; the first entry wins"
            );
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.limits.max_request_body_bytes == 0 {
        errors.push(ValidationError::ZeroLimit("max_request_body_bytes"));
    }
    if config.limits.max_response_body_bytes == 0 {
        errors.push(ValidationError::ZeroLimit("max_response_body_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_backend_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(())
}
