//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (prefix table: swagger-config or /{backend}/{*rest})
//!     → registry.rs (backend segment → BackendEntry)
//!     → Return: resolved backend or NotFound
//!
//! Registry Construction (at startup):
//!     BackendConfig[]
//!     → BackendEntry (name, url, optional path alias, label)
//!     → Freeze as immutable BackendRegistry
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same backend
//! - First match wins (declaration order)

pub mod registry;
pub mod router;

pub use registry::{BackendEntry, BackendRegistry};
pub use router::{GatewayRouter, Route};
