//! Response shaping.
//!
//! # Responsibilities
//! - Render upstream JSON as a local 200 `application/json` response
//! - Render every [`GatewayError`] as one `ErrorBody` shape
//! - Translate an upstream fetch outcome for a specific route
//!
//! # Design Decisions
//! - One error type with optional fields, always populated the same way
//! - Upstream non-2xx becomes local 404; the upstream code is data only
//! - Transport failures are 500 with the underlying message in `details`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;
use crate::routing::Route;
use crate::upstream::FetchError;

/// JSON body of every dispatcher error: `{error, details?, status?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::RoutingMiss { .. } => ErrorBody {
                error: "Not found".to_string(),
                details: None,
                status: None,
            },
            GatewayError::UpstreamRejected { resource, status } => ErrorBody {
                error: format!("{resource} not found"),
                details: None,
                status: Some(status.as_u16()),
            },
            GatewayError::TransportFailure { message, details } => ErrorBody {
                error: message.clone(),
                details: Some(details.clone()),
                status: None,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}

/// Map a fetch failure onto the route's error vocabulary.
pub fn translate_failure(route: &Route, err: FetchError) -> GatewayError {
    match err {
        FetchError::Status(status) => GatewayError::UpstreamRejected {
            resource: route.resource.clone(),
            status,
        },
        FetchError::Transport(details) => GatewayError::TransportFailure {
            message: route.failure_message.clone(),
            details,
        },
    }
}

/// Successful upstream payload, re-serialized as-is.
pub fn json_ok(payload: Value) -> Response {
    (StatusCode::OK, Json(payload)).into_response()
}
