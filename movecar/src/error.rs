//! Error types shared by the request normalizer and notification handler.
//!
//! Every variant maps to an HTTP status and a user-facing message. Handlers
//! never let these escape; they are rendered into JSON bodies instead.

use axum::http::StatusCode;
use thiserror::Error;

/// Failure while turning a platform request into a [`NormalizedRequest`].
///
/// [`NormalizedRequest`]: crate::platform::NormalizedRequest
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("无效的请求体")]
    InvalidBody(#[source] serde_json::Error),

    #[error("无效的请求体")]
    InvalidEncoding,

    #[error("无效的请求体")]
    InvalidMethod(String),
}

/// Failure while sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("消息内容不能为空")]
    MissingMessage,

    #[error("未知通知类型")]
    UnknownType(String),

    #[error("{0}Webhook未配置")]
    WebhookNotConfigured(&'static str),

    #[error("发送通知失败")]
    Remote { errcode: i64, errmsg: String },

    #[error("服务器内部错误")]
    Transport(#[from] reqwest::Error),

    #[error("服务器内部错误")]
    Url(#[from] url::ParseError),

    #[error("服务器内部错误")]
    Signing,
}

impl NotifyError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            NotifyError::MissingMessage | NotifyError::UnknownType(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Optional detail string attached to the error body.
    pub fn detail(&self) -> Option<String> {
        match self {
            NotifyError::Remote { errmsg, .. } => Some(errmsg.clone()),
            NotifyError::Transport(e) => Some(e.to_string()),
            NotifyError::Url(e) => Some(e.to_string()),
            NotifyError::Signing => Some("invalid signing key".to_string()),
            _ => None,
        }
    }
}
