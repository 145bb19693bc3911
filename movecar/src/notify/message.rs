//! Notification input parsing, content formatting and robot payloads.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::NotifyError;

/// Asia/Shanghai has no DST, a fixed +08:00 offset is exact.
const SHANGHAI_OFFSET_SECS: i32 = 8 * 3600;

/// Target robot for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    DingTalk,
    WeCom,
}

/// Validated notification input.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub message: String,
    pub request_time: DateTime<Utc>,
    pub kind: NotificationType,
}

impl NotificationRequest {
    /// Validate a decoded request body.
    ///
    /// The message is checked before the type, so a body missing both
    /// reports the missing message.
    pub fn from_body(body: &Value) -> Result<Self, NotifyError> {
        let message = match body.get("message").and_then(Value::as_str) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => return Err(NotifyError::MissingMessage),
        };

        let kind = match body.get("type") {
            None | Some(Value::Null) => NotificationType::DingTalk,
            Some(Value::String(s)) if s == "dingtalk" => NotificationType::DingTalk,
            Some(Value::String(s)) if s == "wecom" => NotificationType::WeCom,
            Some(other) => {
                let name = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
                return Err(NotifyError::UnknownType(name));
            }
        };

        let request_time = parse_request_time(body.get("requestTime")).unwrap_or_else(Utc::now);

        Ok(Self {
            message,
            request_time,
            kind,
        })
    }
}

/// Accept epoch milliseconds (number or numeric string) or RFC 3339.
fn parse_request_time(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = match raw {
        Value::Null => return None,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .or_else(|| {
                DateTime::parse_from_rfc3339(s.trim())
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }),
        _ => None,
    };

    if parsed.is_none() {
        warn!(request_time = %raw, "request_time_invalid_using_now");
    }
    parsed
}

/// Render a timestamp as Shanghai local time, e.g. `2024/1/15 14:30:00`.
pub fn format_shanghai(time: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(SHANGHAI_OFFSET_SECS) {
        Some(offset) => time.with_timezone(&offset).format("%Y/%-m/%-d %H:%M:%S").to_string(),
        None => time.format("%Y/%-m/%-d %H:%M:%S").to_string(),
    }
}

/// Build the human readable notification text.
pub fn compose_content(message: &str, request_time: DateTime<Utc>) -> String {
    format!(
        "🚗 挪车通知\n\n通知内容：{}\n\n通知时间：{}\n\n请及时处理挪车请求！",
        message,
        format_shanghai(request_time)
    )
}

// =============================================================================
// Robot Payloads
// =============================================================================

/// Text message accepted by both DingTalk and WeCom group robots.
#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    msgtype: &'static str,
    text: TextContent<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    at: Option<At>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct At {
    is_at_all: bool,
}

impl<'a> TextMessage<'a> {
    pub fn dingtalk(content: &'a str) -> Self {
        Self {
            msgtype: "text",
            text: TextContent { content },
            at: Some(At { is_at_all: false }),
        }
    }

    pub fn wecom(content: &'a str) -> Self {
        Self {
            msgtype: "text",
            text: TextContent { content },
            at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_contains_message() {
        let time = DateTime::<Utc>::from_timestamp_millis(0).unwrap();
        for message in ["京A12345 请挪车", "x", "  spaces  ", "line\nbreak", "🚙"] {
            assert!(compose_content(message, time).contains(message));
        }
    }

    #[test]
    fn test_content_template() {
        // 2024-01-15T06:30:00Z is 14:30 in Shanghai
        let time = DateTime::parse_from_rfc3339("2024-01-15T06:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            compose_content("hi", time),
            "🚗 挪车通知\n\n通知内容：hi\n\n通知时间：2024/1/15 14:30:00\n\n请及时处理挪车请求！"
        );
    }

    #[test]
    fn test_format_crosses_midnight() {
        let time = DateTime::parse_from_rfc3339("2023-12-31T20:05:09Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_shanghai(time), "2024/1/1 04:05:09");
    }

    #[test]
    fn test_from_body_defaults_to_dingtalk() {
        let request = NotificationRequest::from_body(&json!({"message": "hello"})).unwrap();
        assert_eq!(request.kind, NotificationType::DingTalk);
        assert_eq!(request.message, "hello");
    }

    #[test]
    fn test_from_body_wecom() {
        let request =
            NotificationRequest::from_body(&json!({"message": "hello", "type": "wecom"})).unwrap();
        assert_eq!(request.kind, NotificationType::WeCom);
    }

    #[test]
    fn test_from_body_rejects_bad_message() {
        for body in [
            json!({}),
            json!({"message": ""}),
            json!({"message": 42}),
            json!({"message": null}),
            json!({"type": "unknown"}),
        ] {
            assert!(matches!(
                NotificationRequest::from_body(&body),
                Err(NotifyError::MissingMessage)
            ));
        }
    }

    #[test]
    fn test_from_body_unknown_type() {
        let err = NotificationRequest::from_body(&json!({"message": "m", "type": "unknown"}))
            .unwrap_err();
        assert!(matches!(err, NotifyError::UnknownType(ref t) if t == "unknown"));

        let err = NotificationRequest::from_body(&json!({"message": "m", "type": 3})).unwrap_err();
        assert!(matches!(err, NotifyError::UnknownType(_)));
    }

    #[test]
    fn test_request_time_formats() {
        let expected = DateTime::<Utc>::from_timestamp_millis(1_705_300_200_000).unwrap();

        let millis = NotificationRequest::from_body(
            &json!({"message": "m", "requestTime": 1_705_300_200_000_i64}),
        )
        .unwrap();
        assert_eq!(millis.request_time, expected);

        let text = NotificationRequest::from_body(
            &json!({"message": "m", "requestTime": "2024-01-15T06:30:00Z"}),
        )
        .unwrap();
        assert_eq!(text.request_time, expected);
    }

    #[test]
    fn test_invalid_request_time_falls_back_to_now() {
        let before = Utc::now();
        let request =
            NotificationRequest::from_body(&json!({"message": "m", "requestTime": "yesterday"}))
                .unwrap();
        assert!(request.request_time >= before);
    }

    #[test]
    fn test_payload_shapes() {
        let dingtalk = serde_json::to_value(TextMessage::dingtalk("c")).unwrap();
        assert_eq!(
            dingtalk,
            json!({"msgtype": "text", "text": {"content": "c"}, "at": {"isAtAll": false}})
        );

        let wecom = serde_json::to_value(TextMessage::wecom("c")).unwrap();
        assert_eq!(wecom, json!({"msgtype": "text", "text": {"content": "c"}}));
    }
}
