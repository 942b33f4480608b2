//! Body size limits.
//!
//! # Responsibilities
//! - Buffer request and response bodies up to a configured size
//! - Distinguish "too large" from read failures
//!
//! # Design Decisions
//! - Bodies are fully buffered; the limit bounds memory per request
//! - Oversized request bodies become 413, oversized backend bodies 502

use axum::body::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body as HttpBody;
use thiserror::Error;

/// Failure while buffering a body.
#[derive(Debug, Error)]
pub enum BodyLimitError {
    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read body: {0}")]
    Read(String),
}

/// Collect `body` into memory, failing once it grows past `limit` bytes.
pub async fn collect_limited<B>(body: B, limit: usize) -> Result<Bytes, BodyLimitError>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(BodyLimitError::TooLarge { limit }),
        Err(e) => Err(BodyLimitError::Read(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn test_collects_within_limit() {
        let bytes = collect_limited(Body::from("hello"), 5).await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn test_rejects_over_limit() {
        let err = collect_limited(Body::from("hello world"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, BodyLimitError::TooLarge { limit: 5 }));
    }

    #[tokio::test]
    async fn test_empty_body() {
        let bytes = collect_limited(Body::empty(), 1).await.unwrap();
        assert!(bytes.is_empty());
    }
}
