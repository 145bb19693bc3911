//! Move-your-car notification delivery.
//!
//! ## Flow
//!
//! ```text
//! body → NotificationRequest → content → (sign) → POST robot → errcode → HandlerResult
//! ```
//!
//! Each call performs exactly one outbound request. There is no retry and
//! no deduplication.

pub mod dingtalk;
pub mod message;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

use crate::error::NotifyError;
use crate::handler::{HandlerResult, NotifySuccess};
use crate::Config;

pub use message::{compose_content, NotificationRequest, NotificationType, TextMessage};

/// Robot reply. Both DingTalk and WeCom answer `{errcode, errmsg}`.
#[derive(Debug, Deserialize)]
struct RobotReply {
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: String,
}

/// Send a notification and map every outcome to a [`HandlerResult`].
pub async fn send_notification(
    body: &Value,
    config: &Config,
    client: &reqwest::Client,
) -> HandlerResult {
    match try_send(body, config, client).await {
        Ok(success) => HandlerResult::json(StatusCode::OK, &success),
        Err(e) => {
            match &e {
                NotifyError::Transport(err) => {
                    error!(error = %err, timeout = err.is_timeout(), "notification_transport_failed")
                }
                NotifyError::Remote { errcode, errmsg } => {
                    warn!(errcode = errcode, errmsg = %errmsg, "webhook_remote_error")
                }
                other => warn!(error = %other, status = other.status().as_u16(), "notification_rejected"),
            }
            e.into()
        }
    }
}

async fn try_send(
    body: &Value,
    config: &Config,
    client: &reqwest::Client,
) -> Result<NotifySuccess, NotifyError> {
    let request = NotificationRequest::from_body(body)?;
    let content = compose_content(&request.message, request.request_time);
    let timeout = Duration::from_millis(config.request_timeout_ms);

    info!(
        kind = ?request.kind,
        message_length = request.message.len(),
        "notification_send_start"
    );

    match request.kind {
        NotificationType::DingTalk => {
            let webhook = config
                .dingtalk_webhook
                .as_deref()
                .ok_or(NotifyError::WebhookNotConfigured("钉钉"))?;

            // Signing always uses wall-clock time; requestTime is display-only.
            let url = match config.dingtalk_secret.as_deref() {
                Some(secret) => dingtalk::signed_url(webhook, secret, Utc::now().timestamp_millis())?,
                None => Url::parse(webhook)?,
            };

            deliver(client, url, &TextMessage::dingtalk(&content), timeout).await?;
            info!(kind = "dingtalk", "notification_sent");

            Ok(NotifySuccess {
                success: true,
                message: "钉钉通知发送成功",
            })
        }
        NotificationType::WeCom => {
            let webhook = config
                .wecom_webhook
                .as_deref()
                .ok_or(NotifyError::WebhookNotConfigured("企业微信"))?;

            deliver(client, Url::parse(webhook)?, &TextMessage::wecom(&content), timeout).await?;
            info!(kind = "wecom", "notification_sent");

            Ok(NotifySuccess {
                success: true,
                message: "企业微信通知发送成功",
            })
        }
    }
}

/// POST the payload and interpret the robot's `errcode`.
///
/// The reply body is decoded regardless of HTTP status; robots report
/// failures through `errcode`.
async fn deliver<T: Serialize>(
    client: &reqwest::Client,
    url: Url,
    payload: &T,
    timeout: Duration,
) -> Result<(), NotifyError> {
    let response = client
        .post(url)
        .timeout(timeout)
        .json(payload)
        .send()
        .await?;

    let status = response.status().as_u16();
    let reply: RobotReply = response.json().await?;

    info!(
        status_code = status,
        errcode = ?reply.errcode,
        "webhook_response_received"
    );

    match reply.errcode {
        Some(0) => Ok(()),
        errcode => Err(NotifyError::Remote {
            errcode: errcode.unwrap_or(-1),
            errmsg: reply.errmsg,
        }),
    }
}
