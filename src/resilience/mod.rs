//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce request deadline around send + buffered body)
//!     → On failure: classified by the forwarding engine, never retried
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - One attempt per request; clients own retries

pub mod timeouts;
