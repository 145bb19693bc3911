//! Platform request shapes and normalization.

use axum::http::Method;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RequestError;

/// Uniform request seen by the business handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub method: Method,
    pub body: Value,
}

/// Vercel Node request: the host has already decoded the JSON body.
#[derive(Debug, Clone, Deserialize)]
pub struct VercelRequest {
    pub method: String,
    #[serde(default)]
    pub body: Option<Value>,
}

/// Netlify (AWS Lambda style) event: the body is a raw string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetlifyEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Fetch-event style request (Cloudflare, and the native HTTP server).
#[derive(Debug, Clone, Deserialize)]
pub struct FetchRequest {
    pub method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl FetchRequest {
    /// Build from raw body bytes as received by an HTTP server.
    pub fn from_bytes(method: &Method, body: &[u8]) -> Self {
        Self {
            method: method.as_str().to_string(),
            body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
        }
    }
}

impl VercelRequest {
    pub fn normalize(self) -> Result<NormalizedRequest, RequestError> {
        let method = parse_method(&self.method)?;
        if method != Method::POST {
            return Ok(NormalizedRequest::empty(method));
        }

        let body = match self.body {
            None | Some(Value::Null) => empty_object(),
            // Sent without a JSON content type, the host hands over a string.
            Some(Value::String(raw)) => parse_body(&raw)?,
            Some(value) => value,
        };

        Ok(NormalizedRequest { method, body })
    }
}

impl NetlifyEvent {
    pub fn normalize(self) -> Result<NormalizedRequest, RequestError> {
        let method = parse_method(&self.http_method)?;
        if method != Method::POST {
            return Ok(NormalizedRequest::empty(method));
        }

        let raw = match self.body {
            Some(raw) if self.is_base64_encoded => {
                let bytes = STANDARD
                    .decode(raw.trim())
                    .map_err(|_| RequestError::InvalidEncoding)?;
                String::from_utf8(bytes).map_err(|_| RequestError::InvalidEncoding)?
            }
            Some(raw) => raw,
            None => String::new(),
        };

        Ok(NormalizedRequest {
            method,
            body: parse_body(&raw)?,
        })
    }
}

impl FetchRequest {
    pub fn normalize(self) -> Result<NormalizedRequest, RequestError> {
        let method = parse_method(&self.method)?;
        if method != Method::POST {
            return Ok(NormalizedRequest::empty(method));
        }

        Ok(NormalizedRequest {
            method,
            body: parse_body(self.body.as_deref().unwrap_or_default())?,
        })
    }
}

impl NormalizedRequest {
    fn empty(method: Method) -> Self {
        Self {
            method,
            body: empty_object(),
        }
    }
}

fn parse_method(raw: &str) -> Result<Method, RequestError> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| RequestError::InvalidMethod(raw.to_string()))
}

/// An empty or whitespace-only body decodes to `{}`.
fn parse_body(raw: &str) -> Result<Value, RequestError> {
    if raw.trim().is_empty() {
        return Ok(empty_object());
    }
    serde_json::from_str(raw).map_err(RequestError::InvalidBody)
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
