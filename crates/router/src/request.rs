use crate::error::ApiError;
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// The parts of an inbound HTTP request the router looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<String>,
}

impl FeedbackRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        FeedbackRequest {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parse the body as JSON into `T`.
    /// A missing, empty or malformed body is a validation error.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body: &str = match self.body.as_deref() {
            Some(body) if !body.trim().is_empty() => body,
            _ => return Err(ApiError::Validation("Request body is required".to_string())),
        };

        serde_json::from_str(body)
            .map_err(|err| ApiError::Validation(format!("Invalid request body: {}", err)))
    }
}

impl From<ApiGatewayProxyRequest> for FeedbackRequest {
    fn from(event: ApiGatewayProxyRequest) -> Self {
        // Repeated keys keep their first value
        let mut query: HashMap<String, String> = HashMap::new();
        for (key, value) in event.query_string_parameters.iter() {
            query
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }

        FeedbackRequest {
            method: event.http_method.as_str().to_string(),
            path: event.path.unwrap_or_default(),
            query,
            body: event.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lambda_events::query_map::QueryMap;
    use model::{FEEDBACKS_ID, Feedback};

    #[test]
    fn converts_proxy_request() {
        let event: ApiGatewayProxyRequest = ApiGatewayProxyRequest {
            http_method: "PATCH".parse().unwrap(),
            path: Some("/feedback".to_string()),
            body: Some(r#"{"FEEDBACKS_ID":"f1"}"#.to_string()),
            ..Default::default()
        };

        let request: FeedbackRequest = event.into();

        assert_eq!("PATCH", request.method);
        assert_eq!("/feedback", request.path);
        assert!(request.query.is_empty());
        assert_eq!(Some(r#"{"FEEDBACKS_ID":"f1"}"#), request.body.as_deref());
    }

    #[test]
    fn keeps_every_query_parameter() {
        let parameters: HashMap<String, Vec<String>> = HashMap::from([
            (FEEDBACKS_ID.to_string(), vec!["f1".to_string(), "f2".to_string()]),
            ("source".to_string(), vec!["web".to_string()]),
        ]);
        let event: ApiGatewayProxyRequest = ApiGatewayProxyRequest {
            http_method: "GET".parse().unwrap(),
            path: Some("/feedback".to_string()),
            query_string_parameters: QueryMap::from(parameters),
            ..Default::default()
        };

        let request: FeedbackRequest = event.into();

        assert_eq!(2, request.query.len());
        assert_eq!(Some("f1"), request.query_param(FEEDBACKS_ID));
        assert_eq!(Some("web"), request.query_param("source"));
    }

    #[test]
    fn missing_body_is_validation_error() {
        let request: FeedbackRequest = FeedbackRequest::new("POST", "/feedback").with_body("  ");

        let result: Result<Feedback, ApiError> = request.json_body();

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn malformed_body_is_validation_error() {
        let request: FeedbackRequest =
            FeedbackRequest::new("POST", "/feedback").with_body("{\"FEEDBACKS_ID\":");

        let result: Result<Feedback, ApiError> = request.json_body();

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
