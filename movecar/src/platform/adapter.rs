//! Thin per-platform entry points: normalize, dispatch, render.

use axum::http::Response;
use tracing::{info, warn};

use crate::error::RequestError;
use crate::handler::{dispatch, AppState, Endpoint, HandlerResult};
use crate::platform::request::{FetchRequest, NetlifyEvent, NormalizedRequest, VercelRequest};
use crate::platform::response::{fetch_response, structured, StructuredResponse};

/// Handle a Vercel Node function invocation.
pub async fn handle_vercel(
    endpoint: Endpoint,
    request: VercelRequest,
    state: &AppState,
) -> StructuredResponse {
    let result = run("vercel", endpoint, request.normalize(), state).await;
    structured(&result)
}

/// Handle a Netlify function event.
pub async fn handle_netlify(
    endpoint: Endpoint,
    event: NetlifyEvent,
    state: &AppState,
) -> StructuredResponse {
    let result = run("netlify", endpoint, event.normalize(), state).await;
    structured(&result)
}

/// Handle a fetch-event style request (Cloudflare, native server).
pub async fn handle_fetch(
    endpoint: Endpoint,
    request: FetchRequest,
    state: &AppState,
) -> Response<String> {
    let result = run("cloudflare", endpoint, request.normalize(), state).await;
    fetch_response(&result)
}

async fn run(
    platform: &'static str,
    endpoint: Endpoint,
    normalized: Result<NormalizedRequest, RequestError>,
    state: &AppState,
) -> HandlerResult {
    let result = match normalized {
        Ok(request) => {
            info!(
                platform = platform,
                endpoint = %endpoint,
                method = %request.method,
                "request_received"
            );
            dispatch(endpoint, request, state).await
        }
        Err(e) => {
            warn!(platform = platform, endpoint = %endpoint, error = ?e, "request_normalize_failed");
            e.into()
        }
    };

    info!(
        platform = platform,
        endpoint = %endpoint,
        status_code = result.status.as_u16(),
        "request_complete"
    );

    result
}
