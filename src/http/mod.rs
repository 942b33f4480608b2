//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, body buffering)
//!     → request.rs (InboundRequest, gateway origin)
//!     → proxy::ForwardingEngine
//!     → response.rs (GatewayResponse, JSON error bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{GatewayOrigin, InboundRequest, X_REQUEST_ID};
pub use response::{ErrorBody, GatewayResponse};
pub use server::GatewayServer;
