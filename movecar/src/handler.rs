//! Platform-independent request dispatch.
//!
//! Every host adapter ends up here with a [`NormalizedRequest`] and gets a
//! [`HandlerResult`] back. The result is then rendered into the host's own
//! response shape by [`crate::platform::response`].

use std::{fmt, str::FromStr, sync::Arc};

use axum::http::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{NotifyError, RequestError};
use crate::notify::send_notification;
use crate::platform::NormalizedRequest;
use crate::valid_req_id::get_valid_req_id;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }
}

/// The two functions this service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Notification,
    ValidReqId,
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notification" => Ok(Endpoint::Notification),
            "valid-reqid" | "valid_reqid" => Ok(Endpoint::ValidReqId),
            other => Err(format!("unknown endpoint: {other}")),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Notification => f.write_str("notification"),
            Endpoint::ValidReqId => f.write_str("valid-reqid"),
        }
    }
}

// =============================================================================
// Result Types
// =============================================================================

/// Successful notification body.
#[derive(Debug, Serialize)]
pub struct NotifySuccess {
    pub success: bool,
    pub message: &'static str,
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Uniform handler output: a status plus an optional JSON body.
///
/// A `None` body renders as an empty response (used for CORS preflight).
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResult {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub no_store: bool,
}

impl HandlerResult {
    /// Build a result from any serializable body.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        Self {
            status,
            body: Some(serde_json::to_value(body).unwrap_or_default()),
            no_store: false,
        }
    }

    /// Build an error result.
    pub fn error(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self::json(
            status,
            &ErrorBody {
                error: error.into(),
                detail,
            },
        )
    }

    /// Empty 200 answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
            no_store: false,
        }
    }

    /// Mark the response as not cacheable.
    pub fn with_no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    /// Serialized body, empty when there is none.
    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

impl From<NotifyError> for HandlerResult {
    fn from(err: NotifyError) -> Self {
        HandlerResult::error(err.status(), err.to_string(), err.detail())
    }
}

impl From<RequestError> for HandlerResult {
    fn from(err: RequestError) -> Self {
        HandlerResult::error(StatusCode::BAD_REQUEST, err.to_string(), None)
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run one endpoint for an already-normalized request.
///
/// OPTIONS preflight is answered here before any business logic runs.
pub async fn dispatch(
    endpoint: Endpoint,
    request: NormalizedRequest,
    state: &AppState,
) -> HandlerResult {
    if request.method == Method::OPTIONS {
        info!(endpoint = %endpoint, "cors_preflight");
        return HandlerResult::preflight();
    }

    match endpoint {
        Endpoint::Notification => {
            if request.method != Method::POST {
                warn!(method = %request.method, "notification_method_not_allowed");
                return HandlerResult::error(
                    StatusCode::METHOD_NOT_ALLOWED,
                    "Method not allowed",
                    None,
                );
            }
            send_notification(&request.body, &state.config, &state.client).await
        }
        Endpoint::ValidReqId => get_valid_req_id(&state.config),
    }
}
