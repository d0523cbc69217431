//! Outbound HTTP client for the content API.
//!
//! # Responsibilities
//! - Build the shared reqwest client (timeouts, user agent)
//! - Perform exactly one GET per dispatched request
//! - Classify the outcome: JSON payload, non-2xx status, or transport error
//!
//! # Design Decisions
//! - No retries; the caller sees the first outcome
//! - The total deadline bounds connect, headers and body read
//! - Dropping the returned future abandons the call (client disconnects)

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::error::error_chain;

/// Outcome of a failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered, but not with 2xx.
    #[error("upstream returned {0}")]
    Status(StatusCode),

    /// The call never produced a usable body.
    #[error("{0}")]
    Transport(String),
}

/// Shared client for the configured upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying client, shared with the image relay.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// GET `url` and parse a 2xx body as JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Transport(error_chain(&e)))
    }
}
