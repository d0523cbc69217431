//! Request-scoped gateway errors.
//!
//! Every variant is handled inside the request that raised it and rendered
//! by [`crate::http::response`]; none is retried or escalated.

use axum::http::StatusCode;
use thiserror::Error;

/// Why a dispatched request did not produce upstream JSON.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No route pattern matched the inbound path.
    #[error("no route matches '{path}'")]
    RoutingMiss { path: String },

    /// The upstream answered with a non-2xx status.
    #[error("{resource} not found (upstream status {status})")]
    UpstreamRejected { resource: String, status: StatusCode },

    /// Network error, timeout, or an unparseable upstream body.
    #[error("{message}: {details}")]
    TransportFailure { message: String, details: String },
}

impl GatewayError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::RoutingMiss { .. } => "routing_miss",
            GatewayError::UpstreamRejected { .. } => "upstream_rejected",
            GatewayError::TransportFailure { .. } => "transport_failure",
        }
    }

    /// Status sent to the caller. Upstream rejections always collapse to 404.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RoutingMiss { .. } | GatewayError::UpstreamRejected { .. } => {
                StatusCode::NOT_FOUND
            }
            GatewayError::TransportFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render an error with its full `source()` chain, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
