//! MoveCar - "please move your car" notification relay.
//!
//! This library provides shared modules for the two MoveCar binaries:
//! - `movecar-web`: Native HTTP server exposing both functions
//! - `movecar-invoke`: One-shot runner for serverless platform events
//!
//! ## Architecture
//!
//! ```text
//! Platform request → normalize → dispatch → HandlerResult → platform response
//!                                   │
//!                                   └── notify → DingTalk / WeCom robot
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod notify;
pub mod platform;
pub mod valid_req_id;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{NotifyError, RequestError};
pub use handler::{dispatch, AppState, Endpoint, HandlerResult};
pub use notify::send_notification;
pub use platform::{NormalizedRequest, Platform};
pub use valid_req_id::get_valid_req_id;
