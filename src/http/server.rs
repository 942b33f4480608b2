//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware (tracing, request ID)
//! - Buffer inbound bodies under the configured limit
//! - Hand every request to the forwarding engine
//! - Record per-request metrics and the completion log line
//! - Serve until the shutdown signal fires, then drain

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{request_id, GatewayOrigin, InboundRequest, MakeRequestUuid};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::proxy::{ForwardingEngine, GatewayError, HyperTransport, Transport};
use crate::routing::Route;
use crate::security::limits::{collect_limited, BodyLimitError};

/// Application state injected into handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<ForwardingEngine>,
    local_addr: SocketAddr,
    max_request_body: usize,
    trust_forwarded: bool,
}

/// HTTP front end of the gateway.
pub struct GatewayServer {
    config: GatewayConfig,
    engine: Arc<ForwardingEngine>,
}

impl GatewayServer {
    /// Create a server that forwards through a pooled hyper client.
    pub fn new(config: GatewayConfig) -> Self {
        let transport = Arc::new(HyperTransport::new(&config.timeouts, &config.limits));
        Self::with_transport(config, transport)
    }

    /// Create a server with a custom transport.
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let engine = Arc::new(ForwardingEngine::new(&config, transport));

        tracing::info!(
            prefix = %engine.router().root(),
            backends = engine.registry().len(),
            "Gateway initialized"
        );
        for entry in engine.registry().iter() {
            tracing::info!(
                backend = %entry.routing_key(),
                url = %entry.base_url(),
                "Registered backend"
            );
        }

        Self { config, engine }
    }

    pub fn engine(&self) -> &Arc<ForwardingEngine> {
        &self.engine
    }

    /// Build the Axum router. `local_addr` is the origin of last resort
    /// when a request carries no `Host`.
    pub fn router(&self, local_addr: SocketAddr) -> Router {
        let state = AppState {
            engine: self.engine.clone(),
            local_addr,
            max_request_body: self.config.limits.max_request_body_bytes,
            trust_forwarded: self.config.gateway.trust_forwarded_headers,
        };

        Router::new()
            .fallback(gateway_handler)
            .with_state(state)
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router(addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Buffers the request and runs it through the engine.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let method = parts.method.to_string();

    let body = match collect_limited(body, state.max_request_body).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = match e {
                BodyLimitError::TooLarge { limit } => GatewayError::PayloadTooLarge { limit },
                BodyLimitError::Read(msg) => GatewayError::InvalidRequestBody(msg),
            };
            tracing::warn!(request_id = %request_id, error = %err, "Rejected request body");

            let response =
                state
                    .engine
                    .error_response(&err, parts.uri.path(), parts.headers.get(header::ORIGIN));
            metrics::record_request(&method, response.status.as_u16(), "none", start);
            return response.into_response();
        }
    };

    let inbound = InboundRequest {
        origin: GatewayOrigin::from_request(
            &parts.uri,
            &parts.headers,
            state.local_addr,
            state.trust_forwarded,
        ),
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };

    let response = state.engine.handle(&inbound).await;
    let backend = backend_label(&state.engine, &inbound.path);

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %inbound.path,
        backend = %backend,
        status = response.status.as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(&method, response.status.as_u16(), backend, start);

    response.into_response()
}

/// Metric label for the backend a path addresses. Unknown segments
/// collapse to one value to keep label cardinality bounded.
fn backend_label<'a>(engine: &'a ForwardingEngine, path: &str) -> &'a str {
    match engine.router().match_path(path) {
        Some(Route::Forward { backend, .. }) => engine
            .registry()
            .resolve(backend)
            .map(|entry| entry.routing_key())
            .unwrap_or("unknown"),
        Some(Route::SwaggerConfig) => "swagger-config",
        None => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use futures_util::future::BoxFuture;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::BackendConfig;
    use crate::proxy::{BackendResponse, OutboundRequest, TransportError};

    struct EchoTransport;

    impl Transport for EchoTransport {
        fn send(
            &self,
            request: OutboundRequest,
        ) -> BoxFuture<'_, Result<BackendResponse, TransportError>> {
            Box::pin(async move {
                Ok(BackendResponse {
                    status: StatusCode::OK,
                    headers: Default::default(),
                    body: request.uri.to_string().into(),
                })
            })
        }
    }

    fn server(max_body: usize) -> GatewayServer {
        let mut config = GatewayConfig::default();
        config.limits.max_request_body_bytes = max_body;
        config.backends.push(BackendConfig {
            name: "orders".into(),
            url: "http://orders.internal:9001".into(),
            path: None,
            label: None,
        });
        GatewayServer::with_transport(config, Arc::new(EchoTransport))
    }

    fn local() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    #[tokio::test]
    async fn test_forwards_through_router() {
        let app = server(1024).router(local());
        let response = app
            .oneshot(
                Request::get("/mediator/orders/items?limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"http://orders.internal:9001/items?limit=5");
    }

    #[tokio::test]
    async fn test_keeps_client_request_id() {
        let app = server(1024).router(local());
        let response = app
            .oneshot(
                Request::get("/mediator/orders/x")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let app = server(4).router(local());
        let response = app
            .oneshot(
                Request::post("/mediator/orders/items")
                    .body(Body::from("0123456789"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_path_outside_prefix_is_not_found() {
        let app = server(1024).router(local());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_label() {
        let server = server(1024);
        let engine = server.engine();
        assert_eq!(backend_label(engine, "/mediator/orders/x"), "orders");
        assert_eq!(backend_label(engine, "/mediator/nope/x"), "unknown");
        assert_eq!(backend_label(engine, "/mediator/swagger-config"), "swagger-config");
        assert_eq!(backend_label(engine, "/other"), "none");
    }
}
