//! Valid request id lookup.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use crate::handler::HandlerResult;
use crate::Config;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidReqIdBody<'a> {
    valid_req_id: &'a str,
}

/// Return the configured `VALID_REQ_ID`, or a 500 when it is unset.
///
/// Responses are never cacheable.
pub fn get_valid_req_id(config: &Config) -> HandlerResult {
    let result = match config.valid_req_id.as_deref() {
        Some(valid_req_id) => {
            info!(length = valid_req_id.len(), "valid_reqid_served");
            HandlerResult::json(StatusCode::OK, &ValidReqIdBody { valid_req_id })
        }
        None => {
            warn!("valid_reqid_not_configured");
            HandlerResult::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "VALID_REQ_ID 环境变量未设置",
                None,
            )
        }
    };

    result.with_no_store()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_configured_value() {
        let config = Config::from_pairs(&[("VALID_REQ_ID", "abc123")]);
        let result = get_valid_req_id(&config);

        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.body, Some(json!({"validReqId": "abc123"})));
    }

    #[test]
    fn test_unset_value() {
        let result = get_valid_req_id(&Config::from_pairs(&[]));

        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.no_store);
        let body = result.body.unwrap();
        assert!(body["error"].as_str().unwrap().contains("VALID_REQ_ID"));
        assert!(body.get("validReqId").is_none());
    }
}
