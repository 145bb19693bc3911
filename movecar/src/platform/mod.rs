//! Hosting platform adapters.
//!
//! The business handlers only ever see a [`NormalizedRequest`] and return a
//! [`HandlerResult`](crate::handler::HandlerResult). This module owns the
//! translation to and from each host's native shapes:
//!
//! ```text
//! VercelRequest ─┐                                      ┌─ StructuredResponse
//! NetlifyEvent ──┼─ normalize → dispatch → HandlerResult ┼─ StructuredResponse
//! FetchRequest ──┘                                      └─ http::Response
//! ```

pub mod adapter;
pub mod request;
pub mod response;

use std::{fmt, str::FromStr};

use tracing::{debug, warn};

use crate::Config;

pub use adapter::{handle_fetch, handle_netlify, handle_vercel};
pub use request::{FetchRequest, NetlifyEvent, NormalizedRequest, VercelRequest};
pub use response::{StructuredResponse, CORS_HEADERS};

/// Hosting platform whose request/response shapes we speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Vercel,
    Netlify,
    Cloudflare,
}

impl Platform {
    /// Decide which adapter to use.
    ///
    /// An explicit `DEPLOY_PLATFORM` wins, then host markers, then Vercel.
    pub fn detect(config: &Config) -> Platform {
        if let Some(raw) = config.deploy_platform.as_deref() {
            match raw.parse::<Platform>() {
                Ok(platform) => {
                    debug!(platform = %platform, "platform_from_deploy_platform");
                    return platform;
                }
                Err(_) => warn!(value = %raw, "deploy_platform_unrecognized"),
            }
        }

        let platform = if config.vercel_marker {
            Platform::Vercel
        } else if config.netlify_marker {
            Platform::Netlify
        } else if config.cloudflare_marker {
            Platform::Cloudflare
        } else {
            Platform::Vercel
        };

        debug!(platform = %platform, "platform_detected");
        platform
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vercel" => Ok(Platform::Vercel),
            "netlify" => Ok(Platform::Netlify),
            "cloudflare" => Ok(Platform::Cloudflare),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Vercel => f.write_str("vercel"),
            Platform::Netlify => f.write_str("netlify"),
            Platform::Cloudflare => f.write_str("cloudflare"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_fallback_is_vercel() {
        assert_eq!(Platform::detect(&Config::from_pairs(&[])), Platform::Vercel);
    }

    #[test]
    fn test_detect_deploy_platform_wins() {
        let config = Config::from_pairs(&[("DEPLOY_PLATFORM", "Cloudflare"), ("VERCEL", "1")]);
        assert_eq!(Platform::detect(&config), Platform::Cloudflare);
    }

    #[test]
    fn test_detect_unrecognized_deploy_platform_ignored() {
        let config = Config::from_pairs(&[("DEPLOY_PLATFORM", "heroku"), ("NETLIFY", "true")]);
        assert_eq!(Platform::detect(&config), Platform::Netlify);
    }

    #[test]
    fn test_detect_markers() {
        assert_eq!(
            Platform::detect(&Config::from_pairs(&[("VERCEL", "1")])),
            Platform::Vercel
        );
        assert_eq!(
            Platform::detect(&Config::from_pairs(&[("CF_PAGES", "1")])),
            Platform::Cloudflare
        );
        // Both markers: Vercel is checked first.
        assert_eq!(
            Platform::detect(&Config::from_pairs(&[("NETLIFY", "true"), ("VERCEL", "1")])),
            Platform::Vercel
        );
    }
}
