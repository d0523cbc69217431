//! Image relay.
//!
//! `GET /proxy-image?url=<absolute-url>` fetches the given URL and streams
//! its body back untouched, independent of the route table.
//!
//! # Design Decisions
//! - Plain-text errors: `Missing URL` (400), `Image fetch failed` (500)
//! - Network errors and non-2xx upstream statuses are not distinguished
//! - Content-Type is passed through, falling back to a configured default
//! - Any host is fetched unless `relay.allowed_hosts` is set

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use url::Url;

use crate::config::RelayConfig;
use crate::error::error_chain;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

const ROUTE_LABEL: &str = "proxy-image";

/// Query string of the relay endpoint.
#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    pub url: Option<String>,
}

/// Why a relay target was refused before fetching.
#[derive(Debug, PartialEq, Eq)]
pub enum RelayRejection {
    /// Not an absolute http(s) URL.
    Invalid(String),
    /// Host outside `relay.allowed_hosts`.
    HostNotAllowed(String),
}

/// Relay settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct RelayPolicy {
    allowed_hosts: Vec<String>,
    default_content_type: HeaderValue,
    timeout: Duration,
}

impl RelayPolicy {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            allowed_hosts: config
                .allowed_hosts
                .iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .collect(),
            default_content_type: HeaderValue::from_str(&config.default_content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("image/png")),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Parse `raw` and check it against the host allow-list.
    pub fn admit(&self, raw: &str) -> Result<Url, RelayRejection> {
        let url = Url::parse(raw).map_err(|e| RelayRejection::Invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayRejection::Invalid(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| RelayRejection::Invalid("missing host".to_string()))?
            .to_ascii_lowercase();

        if !self.allowed_hosts.is_empty() && !self.allowed_hosts.contains(&host) {
            return Err(RelayRejection::HostNotAllowed(host));
        }
        Ok(url)
    }

    /// Content-Type for the relayed body.
    pub fn content_type(&self, upstream: Option<&HeaderValue>) -> HeaderValue {
        upstream
            .cloned()
            .unwrap_or_else(|| self.default_content_type.clone())
    }
}

fn fetch_failed() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Image fetch failed").into_response()
}

/// Handler for `GET /proxy-image`.
pub async fn relay_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RelayQuery>,
) -> Response {
    let start_time = Instant::now();
    let response = relay(&state, request_id(&headers), query).await;
    metrics::record_request("GET", response.status().as_u16(), ROUTE_LABEL, start_time);
    response
}

async fn relay(state: &AppState, request_id: &str, query: RelayQuery) -> Response {
    let Some(raw) = query.url.filter(|u| !u.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing URL").into_response();
    };

    let url = match state.relay.admit(&raw) {
        Ok(url) => url,
        Err(RelayRejection::HostNotAllowed(host)) => {
            tracing::warn!(request_id = %request_id, host = %host, "Relay host not allowed");
            return (StatusCode::FORBIDDEN, "Host not allowed").into_response();
        }
        Err(RelayRejection::Invalid(reason)) => {
            tracing::warn!(request_id = %request_id, url = %raw, reason = %reason, "Invalid relay URL");
            metrics::record_upstream_failure(ROUTE_LABEL, "invalid_url");
            return fetch_failed();
        }
    };

    tracing::debug!(request_id = %request_id, url = %url, "Relaying image");

    // TODO: re-check allowed_hosts on redirect hops, not only the first URL.
    let upstream = match state
        .upstream
        .http()
        .get(url.clone())
        .timeout(state.relay.timeout)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            tracing::warn!(
                request_id = %request_id,
                url = %url,
                status = %response.status(),
                "Image upstream rejected request"
            );
            metrics::record_upstream_failure(ROUTE_LABEL, "upstream_rejected");
            return fetch_failed();
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                url = %url,
                error = %error_chain(&e),
                "Image fetch failed"
            );
            metrics::record_upstream_failure(ROUTE_LABEL, "transport_failure");
            return fetch_failed();
        }
    };

    let content_type = state.relay.content_type(upstream.headers().get(CONTENT_TYPE));
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type),
            (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response()
}
