//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, timeout)
//! - Buffer the callback body once, route it, rewrite and forward
//! - Pick the default upstream for passthrough requests
//! - Observability (structured logs, metrics, request ids)

use axum::{
    body::{Body, HttpBody},
    extract::State,
    http::{uri::Authority, Request, StatusCode, Version},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{RequestId, X_REQUEST_ID};
use crate::http::rewrite::{passthrough_uri, rewrite_request};
use crate::observability::{log_route_decision, metrics};
use crate::lifecycle::ShutdownListener;
use crate::routing::{route_callback, RouteTable, RouteTableError};

/// Error building the gateway from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Routes(#[from] RouteTableError),

    #[error("invalid default_upstream {upstream:?}: {source}")]
    DefaultUpstream {
        upstream: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub client: Client<HttpConnector, Body>,
    pub default_upstream: Option<Authority>,
    pub max_body_size: usize,
}

/// HTTP server for the callback gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let routes = Arc::new(RouteTable::from_config(&config.backends)?);

        let default_upstream = config
            .default_upstream
            .as_deref()
            .map(|upstream| {
                upstream
                    .parse::<Authority>()
                    .map_err(|source| ServerError::DefaultUpstream {
                        upstream: upstream.to_string(),
                        source,
                    })
            })
            .transpose()?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            routes,
            client,
            default_upstream,
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The request router, for serving on a custom transport.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.config.backends.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main gateway handler.
/// Buffers the body, decides the backend, rewrites and forwards.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = RequestId::from_headers(&parts.headers);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        "Proxying callback"
    );

    // 1. Buffer the body; the same bytes are decoded and resent
    if body.size_hint().lower() > state.max_body_size as u64 {
        tracing::warn!(request_id = %request_id, limit = state.max_body_size, "Callback body too large");
        metrics::record_upstream(StatusCode::PAYLOAD_TOO_LARGE.as_u16(), start_time);
        return error_response(&request_id, StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
    }
    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read callback body");
            metrics::record_upstream(StatusCode::BAD_REQUEST.as_u16(), start_time);
            return error_response(&request_id, StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    // 2. Decide the destination
    let decision = route_callback(&body, &state.routes);
    log_route_decision(&request_id, &decision, &body);
    metrics::record_callback(decision.outcome());

    // 3. Rewrite; passthrough requests keep an absolute-form host or go to
    //    the default upstream, always over plain http
    let mut outbound = rewrite_request(parts, body, decision.backend());
    if decision.backend().is_none() {
        let destination = passthrough_uri(outbound.uri(), state.default_upstream.as_ref());
        match destination {
            Some(uri) => *outbound.uri_mut() = uri,
            None => {
                tracing::error!(
                    request_id = %request_id,
                    outcome = decision.outcome(),
                    "No backend matched and no default upstream configured"
                );
                metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16(), start_time);
                return error_response(&request_id, StatusCode::BAD_GATEWAY, "No upstream for callback");
            }
        }
    }
    *outbound.version_mut() = Version::HTTP_11;
    let upstream = outbound
        .uri()
        .authority()
        .map(ToString::to_string)
        .unwrap_or_default();

    // 4. Forward
    match state.client.request(outbound).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                upstream = %upstream,
                status = %response.status(),
                "Upstream responded"
            );
            metrics::record_upstream(response.status().as_u16(), start_time);
            relay_response(response, &request_id)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Upstream error");
            metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16(), start_time);
            error_response(&request_id, StatusCode::BAD_GATEWAY, "Upstream request failed")
        }
    }
}

/// Stream the backend response back to the caller, tagged with the request id.
fn relay_response(response: hyper::Response<Incoming>, request_id: &RequestId) -> Response {
    let (parts, body) = response.into_parts();
    let mut response = Response::from_parts(parts, Body::new(body));
    attach_request_id(&mut response, request_id);
    response
}

fn error_response(request_id: &RequestId, status: StatusCode, message: &'static str) -> Response {
    let mut response = (status, message).into_response();
    attach_request_id(&mut response, request_id);
    response
}

fn attach_request_id(response: &mut Response, request_id: &RequestId) {
    if let Some(value) = request_id.header_value() {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use axum::http::header;
    use tower::ServiceExt;

    fn callback_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/slack/actions")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(X_REQUEST_ID, "req-1")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_passthrough_without_default_upstream_is_bad_gateway() {
        let mut config = GatewayConfig::default();
        config.backends.push(BackendConfig::new("approve_req", "127.0.0.1:1"));
        let server = GatewayServer::new(config).unwrap();

        let response = server
            .router()
            .oneshot(callback_request("payload=%7B%22type%22%3A%22message%22%7D"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "req-1");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = GatewayConfig::default();
        config.limits.max_body_size = 8;
        let server = GatewayServer::new(config).unwrap();

        let response = server
            .router()
            .oneshot(callback_request("payload=this-is-longer-than-eight-bytes"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_invalid_default_upstream_is_rejected() {
        let config = GatewayConfig {
            default_upstream: Some("not a host".into()),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            GatewayServer::new(config),
            Err(ServerError::DefaultUpstream { .. })
        ));
    }

    #[tokio::test]
    async fn test_absolute_form_passthrough_is_sent_over_http() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let backend = listener.local_addr().unwrap();
        let app = Router::new().fallback(|request: Request<Body>| async move {
            format!("{} {}", request.method(), request.uri())
        });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let server = GatewayServer::new(GatewayConfig::default()).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri(format!("https://{}/slack/actions?team=T1", backend))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("token=abc"))
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"POST /slack/actions?team=T1");
    }
}
