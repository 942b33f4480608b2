//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request:
//!     → headers.rs (drop Host, Content-Length, Connection)
//!     → Pass to transport
//!
//! Backend response:
//!     → headers.rs (drop framing headers, strip backend CORS)
//!     → cors.rs (merge gateway CORS headers)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Transparent by default: only framing and CORS headers are touched
//! - The gateway is the sole authority for CORS headers
//! - Preflight requests never reach a backend
//! - Buffered bodies are bounded by limits.rs

pub mod cors;
pub mod headers;
pub mod limits;

pub use cors::CorsPolicy;
