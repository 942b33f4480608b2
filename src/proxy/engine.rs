//! Forwarding engine.
//!
//! # Flow
//! ```text
//! InboundRequest
//!     → OPTIONS under the prefix?         yes           → 200 + CORS, no backend call
//!     → router (prefix table)             no match      → 404
//!     → swagger-config?                   yes           → aggregated listing
//!     → registry.resolve(segment)         unknown       → 400 (or 404 by policy)
//!     → transport.send(outbound)          connect/timeout/other → 503/504/502
//!     → rest ends with api-docs suffix?   yes           → rewrite servers (best effort)
//!     → filter headers, merge CORS        → client response
//! ```
//!
//! Every outcome, including errors, leaves with the gateway CORS headers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};

use crate::config::{BackendNotFoundPolicy, GatewayConfig};
use crate::http::request::InboundRequest;
use crate::http::response::{ErrorBody, GatewayResponse};
use crate::observability::metrics;
use crate::proxy::error::{GatewayError, TransportError};
use crate::proxy::rewrite::rewrite_servers;
use crate::proxy::swagger::{build_swagger_config, SwaggerConfig, SwaggerUrl};
use crate::proxy::transport::{BackendResponse, OutboundRequest, Transport};
use crate::routing::{BackendRegistry, GatewayRouter, Route};
use crate::security::headers::{inbound_headers, outbound_headers, strip_cors_headers};
use crate::security::CorsPolicy;

/// Methods forwarded to backends. OPTIONS is answered locally.
const FORWARDED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// `Allow` values for 405 responses.
const FORWARD_ALLOW: &str = "GET, POST, PUT, DELETE, OPTIONS";
const SWAGGER_CONFIG_ALLOW: &str = "GET, OPTIONS";

/// Stateless request forwarder shared by all connections.
pub struct ForwardingEngine {
    registry: BackendRegistry,
    router: GatewayRouter,
    transport: Arc<dyn Transport>,
    cors: CorsPolicy,
    strip_backend_cors: bool,
    api_docs_suffix: String,
    not_found: BackendNotFoundPolicy,
    detailed_errors: bool,
    swagger: SwaggerConfig,
}

impl ForwardingEngine {
    pub fn new(config: &GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let registry = BackendRegistry::from_config(&config.backends);
        let router = GatewayRouter::new(&config.gateway.prefix);

        let self_docs = config.gateway.self_docs_url.as_ref().map(|url| SwaggerUrl {
            name: config.gateway.self_docs_label.clone(),
            url: url.clone(),
        });
        let swagger = build_swagger_config(
            &registry,
            &router,
            &config.gateway.api_docs_suffix,
            self_docs,
        );

        Self {
            registry,
            router,
            transport,
            cors: CorsPolicy::new(config.cors.origin),
            strip_backend_cors: config.cors.strip_backend_headers,
            api_docs_suffix: config.gateway.api_docs_suffix.clone(),
            not_found: config.gateway.backend_not_found,
            detailed_errors: config.errors.detailed,
            swagger,
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn router(&self) -> &GatewayRouter {
        &self.router
    }

    /// Handle one request; never fails.
    pub async fn handle(&self, request: &InboundRequest) -> GatewayResponse {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(err) => self.error_response(&err, &request.path, request.origin_header()),
        }
    }

    /// Render `err` as a JSON error response with CORS headers.
    pub fn error_response(
        &self,
        err: &GatewayError,
        path: &str,
        origin: Option<&HeaderValue>,
    ) -> GatewayResponse {
        let status = err.status_with(self.not_found);
        let mut body = ErrorBody::new(status, err.to_string());
        if self.detailed_errors {
            body = body.detailed(status, path);
        }

        let mut response = GatewayResponse::json(status, &body);
        if let GatewayError::MethodNotAllowed { allow, .. } = err {
            response
                .headers
                .insert(header::ALLOW, HeaderValue::from_static(*allow));
        }
        self.cors.apply(&mut response.headers, origin);
        response
    }

    async fn dispatch(&self, request: &InboundRequest) -> Result<GatewayResponse, GatewayError> {
        if request.method == Method::OPTIONS && self.router.is_under_prefix(&request.path) {
            return Ok(self.preflight(request.origin_header()));
        }

        let route = self
            .router
            .match_path(&request.path)
            .ok_or_else(|| GatewayError::NoRoute(request.path.clone()))?;

        match route {
            Route::SwaggerConfig => {
                if request.method != Method::GET {
                    return Err(GatewayError::MethodNotAllowed {
                        method: request.method.to_string(),
                        allow: SWAGGER_CONFIG_ALLOW,
                    });
                }
                let mut response = GatewayResponse::json(StatusCode::OK, &self.swagger);
                self.cors.apply(&mut response.headers, request.origin_header());
                Ok(response)
            }
            Route::Forward { backend, rest } => self.forward(request, backend, rest).await,
        }
    }

    fn preflight(&self, origin: Option<&HeaderValue>) -> GatewayResponse {
        GatewayResponse::new(StatusCode::OK, self.cors.headers(origin), Bytes::new())
    }

    async fn forward(
        &self,
        request: &InboundRequest,
        segment: &str,
        rest: &str,
    ) -> Result<GatewayResponse, GatewayError> {
        if !FORWARDED_METHODS.contains(&request.method) {
            return Err(GatewayError::MethodNotAllowed {
                method: request.method.to_string(),
                allow: FORWARD_ALLOW,
            });
        }

        let backend = self
            .registry
            .resolve(segment)
            .ok_or_else(|| GatewayError::BackendNotFound(segment.to_string()))?;

        let target = target_url(backend.base_url(), rest, request.query.as_deref());
        let uri: Uri = target
            .parse()
            .map_err(|e| TransportError::InvalidUri(format!("{target}: {e}")))?;

        tracing::info!(
            backend = %segment,
            method = %request.method,
            target = %target,
            "Forwarding request"
        );

        let outbound = OutboundRequest {
            method: request.method.clone(),
            uri,
            headers: outbound_headers(&request.headers),
            body: (!request.body.is_empty()).then(|| request.body.clone()),
        };

        let response = self.transport.send(outbound).await.map_err(|e| {
            tracing::error!(backend = %segment, target = %target, error = %e, "Backend request failed");
            let err = GatewayError::from(e);
            metrics::record_backend_error(backend.routing_key(), err.kind());
            err
        })?;

        if response.status.is_success() {
            tracing::info!(backend = %segment, status = %response.status, "Backend request succeeded");
        } else {
            tracing::warn!(backend = %segment, status = %response.status, "Backend returned non-success status");
        }

        Ok(self.relay(request, segment, rest, response))
    }

    fn relay(
        &self,
        request: &InboundRequest,
        segment: &str,
        rest: &str,
        response: BackendResponse,
    ) -> GatewayResponse {
        let BackendResponse {
            status,
            headers,
            mut body,
        } = response;

        if rest.ends_with(&self.api_docs_suffix) {
            let gateway_url = request.origin.url(&self.router.backend_base(segment));
            body = rewrite_servers(&body, &gateway_url);
        }

        let mut headers = inbound_headers(&headers);
        if self.strip_backend_cors {
            strip_cors_headers(&mut headers);
        }
        self.cors.apply(&mut headers, request.origin_header());

        GatewayResponse::new(status, headers, body)
    }
}

/// `{base}{rest}` plus `?{query}` when the client sent one.
fn target_url(base: &str, rest: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{base}{rest}?{query}"),
        None => format!("{base}{rest}"),
    }
}
