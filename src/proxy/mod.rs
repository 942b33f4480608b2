//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → engine.rs (route, resolve backend, build target URL)
//!     → transport.rs (send to backend under a deadline)
//!     → rewrite.rs (api-docs `servers` rewrite)
//!     → engine.rs (filter headers, merge CORS)
//!     → GatewayResponse
//! ```
//!
//! Failures are mapped to statuses in error.rs; the aggregated Swagger
//! listing is built once at startup in swagger.rs.

pub mod engine;
pub mod error;
pub mod rewrite;
pub mod swagger;
pub mod transport;

pub use engine::ForwardingEngine;
pub use error::{GatewayError, TransportError};
pub use transport::{BackendResponse, HyperTransport, OutboundRequest, Transport};
