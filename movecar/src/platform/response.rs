//! Rendering a [`HandlerResult`] into platform response shapes.
//!
//! Every response carries permissive CORS headers.

use std::collections::BTreeMap;

use axum::http::{
    header::{self, HeaderValue},
    Response,
};
use serde::Serialize;

use crate::handler::HandlerResult;

/// Cross-origin headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

const JSON_CONTENT_TYPE: &str = "application/json";
const NO_STORE: &str = "no-store";

/// `{statusCode, headers, body}` object returned by Vercel/Netlify functions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Render for Vercel/Netlify style hosts.
pub fn structured(result: &HandlerResult) -> StructuredResponse {
    let mut headers: BTreeMap<String, String> = CORS_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if result.body.is_some() {
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
    }
    if result.no_store {
        headers.insert("Cache-Control".to_string(), NO_STORE.to_string());
    }

    StructuredResponse {
        status_code: result.status.as_u16(),
        headers,
        body: result.body_string(),
    }
}

/// Render a native response for fetch-event style hosts.
pub fn fetch_response(result: &HandlerResult) -> Response<String> {
    let mut response = Response::new(result.body_string());
    *response.status_mut() = result.status;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_HEADERS[0].1),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_HEADERS[1].1),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_HEADERS[2].1),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    if result.no_store {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    }

    response
}
