//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Send one fully buffered request to a backend
//! - Decode compressed backend bodies before they are buffered
//! - Buffer the backend response up to the configured limit
//! - Classify failures (connect, timeout, other)
//!
//! # Design Decisions
//! - `Transport` is a trait so the engine can be driven by a stub in tests
//! - Pooled hyper-util client; the pool owns connection lifecycle
//! - The whole exchange runs under one deadline
//! - Responses are relayed without `Content-Encoding`, so the client's
//!   `Accept-Encoding` is replaced by the codings the decoder supports

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use futures_util::future::BoxFuture;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tower::ServiceExt;
use tower_http::decompression::Decompression;

use crate::config::{LimitsConfig, TimeoutConfig};
use crate::proxy::error::TransportError;
use crate::resilience::timeouts::with_deadline;
use crate::security::limits::{collect_limited, BodyLimitError};

/// Request sent to a backend.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// `None` sends no entity at all.
    pub body: Option<Bytes>,
}

/// Fully buffered backend response.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Dispatches outbound requests.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<BackendResponse, TransportError>>;
}

/// [`Transport`] backed by a pooled hyper-util client.
#[derive(Clone)]
pub struct HyperTransport {
    client: Decompression<Client<HttpConnector, Body>>,
    connect_timeout: Duration,
    request_timeout: Duration,
    max_response_body: usize,
}

impl HyperTransport {
    pub fn new(timeouts: &TimeoutConfig, limits: &LimitsConfig) -> Self {
        let connect_timeout = Duration::from_secs(timeouts.connect_secs);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        let client = Decompression::new(Client::builder(TokioExecutor::new()).build(connector));

        Self {
            client,
            connect_timeout,
            request_timeout: Duration::from_secs(timeouts.request_secs),
            max_response_body: limits.max_response_body_bytes,
        }
    }

    async fn exchange(&self, outbound: OutboundRequest) -> Result<BackendResponse, TransportError> {
        let mut builder = Request::builder().method(outbound.method).uri(outbound.uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = outbound.headers;
            // The decompression layer advertises what it can decode.
            headers.remove(header::ACCEPT_ENCODING);
        }

        let body = outbound.body.map(Body::from).unwrap_or_else(Body::empty);
        let request = builder
            .body(body)
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let response = self
            .client
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| self.classify(e))?;

        let (parts, body) = response.into_parts();
        let body = collect_limited(body, self.max_response_body)
            .await
            .map_err(|e| match e {
                BodyLimitError::TooLarge { limit } => TransportError::ResponseTooLarge { limit },
                BodyLimitError::Read(detail) => TransportError::Request(detail),
            })?;

        Ok(BackendResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    fn classify(&self, error: hyper_util::client::legacy::Error) -> TransportError {
        let detail = error_chain(&error);
        if error.is_connect() {
            if has_timed_out(&error) {
                TransportError::Timeout(self.connect_timeout)
            } else {
                TransportError::Connect(detail)
            }
        } else {
            TransportError::Request(detail)
        }
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<BackendResponse, TransportError>> {
        Box::pin(with_deadline(self.request_timeout, self.exchange(request)))
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(error: &dyn StdError) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn has_timed_out(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}
