//! Configuration module for environment variable parsing.
//!
//! All handler configuration comes from environment variables. The loaded
//! [`Config`] is passed explicitly into every handler; nothing reads the
//! process environment after startup.

use std::env;
use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DingTalk group robot webhook URL (usually carries `access_token`)
    pub dingtalk_webhook: Option<String>,

    /// DingTalk "加签" secret; enables URL signing when present
    pub dingtalk_secret: Option<String>,

    /// WeCom group robot webhook URL
    pub wecom_webhook: Option<String>,

    /// Value returned by the valid-reqid endpoint
    pub valid_req_id: Option<String>,

    /// Explicit deployment platform override
    pub deploy_platform: Option<String>,

    /// Host markers used by platform detection
    pub vercel_marker: bool,
    pub netlify_marker: bool,
    pub cloudflare_marker: bool,

    // =========================================================================
    // Web Server Configuration
    // =========================================================================

    /// Port for the web server to listen on
    pub port: u16,

    /// Outbound webhook request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            dingtalk_webhook: get("DINGTALK_WEBHOOK"),
            dingtalk_secret: get("DINGTALK_SECRET"),
            wecom_webhook: get("WECOM_WEBHOOK"),
            valid_req_id: get("VALID_REQ_ID"),
            deploy_platform: get("DEPLOY_PLATFORM"),

            vercel_marker: get("VERCEL").is_some(),
            netlify_marker: get("NETLIFY").is_some(),
            cloudflare_marker: get("CF_PAGES").is_some(),

            port: parse_or("PORT", get("PORT"), 8080),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", get("REQUEST_TIMEOUT_MS"), 8000),
        }
    }

    /// Build configuration from static key/value pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }
}

/// Parse a numeric value, falling back to the default on bad input.
fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
                default
            }
        },
    }
}
