//! Native HTTP server exposing both functions.
//!
//! Routes:
//! - `/api/notification`: relay a move-car notification
//! - `/api/valid-reqid`: return the configured request id
//! - `/health`: liveness probe

pub mod handlers;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handler::AppState;

pub use handlers::{health, notification, valid_reqid, HealthResponse};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/notification", any(notification))
        .route("/api/valid-reqid", any(valid_reqid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
