//! HTTP endpoint handlers for the native server.
//!
//! The native server speaks the fetch-event shape: the raw method and body
//! are wrapped in a [`FetchRequest`] and run through the same adapter a
//! Cloudflare deployment would use.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Method, Response},
    Json,
};
use serde::Serialize;

use crate::handler::{AppState, Endpoint};
use crate::platform::{handle_fetch, FetchRequest};

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Function Endpoints
// =============================================================================

/// Move-car notification endpoint (`POST`, `OPTIONS`; anything else is 405).
pub async fn notification(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response<Body> {
    serve(Endpoint::Notification, &state, &method, &body).await
}

/// Valid request id endpoint.
pub async fn valid_reqid(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response<Body> {
    serve(Endpoint::ValidReqId, &state, &method, &body).await
}

async fn serve(endpoint: Endpoint, state: &AppState, method: &Method, body: &[u8]) -> Response<Body> {
    let request = FetchRequest::from_bytes(method, body);
    handle_fetch(endpoint, request, state).await.map(Body::from)
}
