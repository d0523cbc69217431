//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay route and the dispatcher fallback
//! - Wire up middleware (CORS, request ID, tracing, timeout)
//! - Bind server to listener
//! - Dispatch requests through the route table to the upstream
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::middleware::cors_layer;
use crate::http::relay::{relay_handler, RelayPolicy};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response::{json_ok, translate_failure};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{RouteError, Router as RouteTable};
use crate::upstream::UpstreamClient;

/// Errors building the server from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route table: {0}")]
    Routes(#[from] RouteError),

    #[error("upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub upstream: UpstreamClient,
    pub relay: Arc<RelayPolicy>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let state = AppState {
            routes: Arc::new(RouteTable::lessons()?),
            upstream: UpstreamClient::new(&config.upstream)?,
            relay: Arc::new(RelayPolicy::from_config(&config.relay)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/proxy-image", get(relay_handler))
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(cors_layer())
    }

    /// The fully layered router, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Dispatcher: route table lookup, one upstream fetch, response translation.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let path = uri.path();

    let matched = if method == Method::GET {
        state.routes.match_path(path)
    } else {
        None
    };

    let Some(matched) = matched else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return GatewayError::RoutingMiss {
            path: path.to_string(),
        }
        .into_response();
    };

    let route = matched.route;
    let url = matched.upstream_url(state.upstream.base_url());

    tracing::debug!(
        request_id = %request_id,
        route = %route.name,
        upstream = %url,
        "Proxying request"
    );

    let response = match state.upstream.fetch_json(&url).await {
        Ok(payload) => json_ok(payload),
        Err(e) => {
            let err = translate_failure(route, e);
            match &err {
                GatewayError::TransportFailure { .. } => {
                    tracing::error!(request_id = %request_id, route = %route.name, upstream = %url, error = %err, "Upstream error");
                }
                _ => {
                    tracing::warn!(request_id = %request_id, route = %route.name, upstream = %url, error = %err, "Upstream rejected request");
                }
            }
            metrics::record_upstream_failure(&route.name, err.kind());
            err.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), &route.name, start_time);
    response
}
