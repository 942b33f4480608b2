//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with a per-request deadline
//! - Cancel the in-flight call cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Expiry is reported as `TransportError::Timeout`, same as a socket timeout
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::proxy::error::TransportError;

/// Run `call`, failing with [`TransportError::Timeout`] after `deadline`.
///
/// Dropping the future on expiry releases the backend connection.
pub async fn with_deadline<F, T>(deadline: Duration, call: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(deadline)),
    }
}
