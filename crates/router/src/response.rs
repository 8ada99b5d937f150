use lambda_runtime::tracing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NOT_FOUND_BODY: &str = "404 Not Found";

/// Response returned to API Gateway for every handled request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Access-Control-Allow-Origin".to_string(),
        ),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

/// Build an envelope with the body serialized as JSON.
pub fn build_response<T: Serialize>(status_code: u16, body: &T) -> ResponseEnvelope {
    match serde_json::to_string(body) {
        Ok(body) => ResponseEnvelope {
            status_code,
            headers: default_headers(),
            body,
        },
        Err(err) => {
            tracing::error!("Failed to serialize response body: {}", err);

            ResponseEnvelope {
                status_code: 500,
                headers: default_headers(),
                body: r#"{"error":{"code":"serialization_error","message":"Failed to serialize response"}}"#
                    .to_string(),
            }
        }
    }
}

/// Response for an unknown method and path.
/// Unlike every other response the body is plain text.
pub fn not_found() -> ResponseEnvelope {
    ResponseEnvelope {
        status_code: 404,
        headers: default_headers(),
        body: NOT_FOUND_BODY.to_string(),
    }
}
