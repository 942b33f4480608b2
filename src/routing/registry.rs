//! Backend registry.
//!
//! # Responsibilities
//! - Hold the configured backends in declaration order
//! - Resolve a routing segment to its backend
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan by exact, case-sensitive segment equality
//! - First match wins when segments repeat

use crate::config::BackendConfig;

/// A single named backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEntry {
    name: String,
    base_url: String,
    path: Option<String>,
    label: Option<String>,
}

impl BackendEntry {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            path: None,
            label: None,
        }
    }

    /// Use a public routing segment that differs from the name.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The path segment clients use to reach this backend.
    pub fn routing_key(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    /// Human-facing name for API-doc listings.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

impl From<&BackendConfig> for BackendEntry {
    fn from(config: &BackendConfig) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.url.clone(),
            path: config.path.clone(),
            label: config.label.clone(),
        }
    }
}

/// Ordered, read-only list of backends.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    entries: Vec<BackendEntry>,
}

impl BackendRegistry {
    pub fn new(entries: Vec<BackendEntry>) -> Self {
        Self { entries }
    }

    pub fn from_config(backends: &[BackendConfig]) -> Self {
        Self::new(backends.iter().map(BackendEntry::from).collect())
    }

    /// Find the first backend whose routing key equals `segment`.
    pub fn resolve(&self, segment: &str) -> Option<&BackendEntry> {
        self.entries.iter().find(|e| e.routing_key() == segment)
    }

    /// Backends in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &BackendEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
