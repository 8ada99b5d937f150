use crate::response::{ResponseEnvelope, build_response};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use store::StoreError;

/// Errors surfaced to the caller, each mapped to its own status code.
#[derive(Debug)]
pub enum ApiError {
    // The request was missing data or couldn't be parsed
    Validation(String),
    // The addressed feedback doesn't exist
    NotFound(String),
    // The feedback store failed
    Store(StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Store(_) => 502,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Store(_) => "store_error",
        }
    }

    pub fn into_response(self) -> ResponseEnvelope {
        // Store internals stay in the logs
        let message: String = match &self {
            ApiError::Store(_) => "Feedback store request failed".to_string(),
            _ => self.to_string(),
        };

        let body: ErrorBody = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message,
            },
        };

        build_response(self.status_code(), &body)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_missing_entry() {
            ApiError::NotFound(format!("Feedback {} not found", err.feedbacks_id))
        } else {
            ApiError::Store(err)
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(message) => f.write_str(message),
            ApiError::NotFound(message) => f.write_str(message),
            ApiError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use store::StoreErrorReason::{BackendFailure, MissingEntry};
    use store::StoreOperation::{Scan, UpdateAttribute};

    #[test]
    fn missing_entry_becomes_not_found() {
        let err: ApiError =
            StoreError::new("f1".to_string(), UpdateAttribute, MissingEntry).into();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(404, err.status_code());
    }

    #[test]
    fn store_failure_hides_backend_detail() {
        let err: ApiError = StoreError::new(
            String::new(),
            Scan,
            BackendFailure("connection reset".into()),
        )
        .into();

        let response: ResponseEnvelope = err.into_response();
        let body: Value = serde_json::from_str(&response.body).unwrap();

        assert_eq!(502, response.status_code);
        assert_eq!(
            json!({"error": {"code": "store_error", "message": "Feedback store request failed"}}),
            body
        );
    }

    #[test]
    fn validation_error_is_bad_request() {
        let response: ResponseEnvelope =
            ApiError::Validation("Request body is required".to_string()).into_response();
        let body: Value = serde_json::from_str(&response.body).unwrap();

        assert_eq!(400, response.status_code);
        assert_eq!(json!("validation_error"), body["error"]["code"]);
        assert_eq!(json!("Request body is required"), body["error"]["message"]);
    }
}
