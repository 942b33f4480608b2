//! API mediator: a path-prefix gateway in front of a set of HTTP backends.
//!
//! `/{prefix}/{backend}/{*rest}` is forwarded to the backend's base URL,
//! OpenAPI documents are rewritten to point back through the gateway, and
//! CORS is answered centrally.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
