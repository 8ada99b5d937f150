use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemOutput;
use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;
use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use model::env::{
    DEFAULT_TABLE_NAME, FEEDBACK_CONSISTENT_READ, FEEDBACK_SCAN_PAGE_SIZE, FEEDBACK_TABLE_NAME,
};
use model::{Error, FEEDBACKS_ID, Feedback};
use serde_json::{Map, Value};
use std::collections::HashMap;
use store::StoreErrorReason::{BackendFailure, BadState, MissingEntry};
use store::StoreOperation::{DeleteFeedback, GetFeedback, PutFeedback, Scan, UpdateAttribute};
use store::{ContinuationToken, FeedbackStore, ScanPage, StoreError, StoreErrorReason};

type Item = HashMap<String, AttributeValue>;

pub struct DynamoDbFeedbackStore {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
    consistent_read: bool,
    // Scan `Limit`, unset lets DynamoDB fill each 1MB page
    page_size: Option<i32>,
}

impl DynamoDbFeedbackStore {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        DynamoDbFeedbackStore {
            table_name: table_name.into(),
            dynamodb_client,
            consistent_read: false,
            page_size: None,
        }
    }

    /// Create a store configured from the environment.
    /// Falls back to the default table when `FEEDBACK_TABLE_NAME` is unset.
    pub fn from_env(dynamodb_client: aws_sdk_dynamodb::Client) -> Result<Self, Error> {
        let table_name: String =
            std::env::var(FEEDBACK_TABLE_NAME).unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());

        let consistent_read: bool = match std::env::var(FEEDBACK_CONSISTENT_READ) {
            Ok(value) => value.trim().parse::<bool>().map_err(|_| {
                format!("{} must be true or false, got {:?}", FEEDBACK_CONSISTENT_READ, value)
            })?,
            Err(_) => false,
        };

        let page_size: Option<i32> = match std::env::var(FEEDBACK_SCAN_PAGE_SIZE) {
            Ok(value) => match value.trim().parse::<i32>() {
                Ok(size) if size > 0 => Some(size),
                _ => {
                    return Err(format!(
                        "{} must be a positive integer, got {:?}",
                        FEEDBACK_SCAN_PAGE_SIZE, value
                    )
                    .into());
                }
            },
            Err(_) => None,
        };

        Ok(DynamoDbFeedbackStore {
            table_name,
            dynamodb_client,
            consistent_read,
            page_size,
        })
    }

    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn key_of(feedbacks_id: &str) -> Item {
    HashMap::from([(
        FEEDBACKS_ID.to_string(),
        AttributeValue::S(feedbacks_id.to_string()),
    )])
}

fn backend_failure<E>(err: SdkError<E, HttpResponse>) -> StoreErrorReason
where
    E: std::error::Error + Send + Sync + 'static,
{
    BackendFailure(err.into())
}

#[async_trait]
impl FeedbackStore for DynamoDbFeedbackStore {
    async fn get_feedback(&self, feedbacks_id: &str) -> Result<Option<Feedback>, StoreError> {
        let output: GetItemOutput = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .consistent_read(self.consistent_read)
            .set_key(Some(key_of(feedbacks_id)))
            .send()
            .await
            .map_err(|err| {
                StoreError::new(feedbacks_id.to_string(), GetFeedback, backend_failure(err))
            })?;

        let Some(item) = output.item else {
            return Ok(None);
        };

        let feedback: Feedback = serde_dynamo::from_item(item).map_err(|err| {
            StoreError::new(
                feedbacks_id.to_string(),
                GetFeedback,
                BadState(err.to_string()),
            )
        })?;

        Ok(Some(feedback))
    }

    async fn put_feedback(&self, feedback: Feedback) -> Result<(), StoreError> {
        let item: Item = serde_dynamo::to_item(&feedback).map_err(|err| {
            StoreError::new(
                feedback.feedbacks_id.clone(),
                PutFeedback,
                BadState(err.to_string()),
            )
        })?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|err| {
                StoreError::new(
                    feedback.feedbacks_id.clone(),
                    PutFeedback,
                    backend_failure(err),
                )
            })?;

        Ok(())
    }

    async fn update_attribute(
        &self,
        feedbacks_id: &str,
        key: &str,
        value: Value,
    ) -> Result<Map<String, Value>, StoreError> {
        let attribute_value: AttributeValue =
            serde_dynamo::to_attribute_value(&value).map_err(|err| {
                StoreError::new(
                    feedbacks_id.to_string(),
                    UpdateAttribute,
                    BadState(err.to_string()),
                )
            })?;

        // Names go through placeholders so reserved words can be updated.
        // The condition keeps the update from creating a new record.
        let output: UpdateItemOutput = self
            .dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key_of(feedbacks_id)))
            .update_expression("SET #attribute = :value")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#attribute", key)
            .expression_attribute_names("#id", FEEDBACKS_ID)
            .expression_attribute_values(":value", attribute_value)
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|err| {
                let condition_failed: bool = matches!(
                    err.as_service_error(),
                    Some(UpdateItemError::ConditionalCheckFailedException(_))
                );
                let reason: StoreErrorReason = if condition_failed {
                    MissingEntry
                } else {
                    backend_failure(err)
                };

                StoreError::new(feedbacks_id.to_string(), UpdateAttribute, reason)
            })?;

        serde_dynamo::from_item(output.attributes.unwrap_or_default()).map_err(|err| {
            StoreError::new(
                feedbacks_id.to_string(),
                UpdateAttribute,
                BadState(err.to_string()),
            )
        })
    }

    async fn delete_feedback(&self, feedbacks_id: &str) -> Result<Option<Feedback>, StoreError> {
        let output: DeleteItemOutput = self
            .dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_of(feedbacks_id)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|err| {
                StoreError::new(
                    feedbacks_id.to_string(),
                    DeleteFeedback,
                    backend_failure(err),
                )
            })?;

        // No old attributes means nothing was deleted
        let Some(item) = output.attributes else {
            return Ok(None);
        };

        let feedback: Feedback = serde_dynamo::from_item(item).map_err(|err| {
            StoreError::new(
                feedbacks_id.to_string(),
                DeleteFeedback,
                BadState(err.to_string()),
            )
        })?;

        Ok(Some(feedback))
    }

    async fn scan_page(&self, start: Option<ContinuationToken>) -> Result<ScanPage, StoreError> {
        let start_id: String = start
            .as_ref()
            .map(|token| token.0.clone())
            .unwrap_or_default();

        let output: ScanOutput = self
            .dynamodb_client
            .scan()
            .table_name(&self.table_name)
            .consistent_read(self.consistent_read)
            .set_limit(self.page_size)
            .set_exclusive_start_key(start.map(|token| key_of(&token.0)))
            .send()
            .await
            .map_err(|err| StoreError::new(start_id.clone(), Scan, backend_failure(err)))?;

        let items: Vec<Feedback> = serde_dynamo::from_items(output.items.unwrap_or_default())
            .map_err(|err| StoreError::new(start_id.clone(), Scan, BadState(err.to_string())))?;

        let next: Option<ContinuationToken> = match output.last_evaluated_key {
            Some(last_key) => {
                let last_id: &String = last_key
                    .get(FEEDBACKS_ID)
                    .and_then(|value| value.as_s().ok())
                    .ok_or_else(|| {
                        StoreError::new(
                            start_id.clone(),
                            Scan,
                            BadState(format!("LastEvaluatedKey without {}", FEEDBACKS_ID)),
                        )
                    })?;

                Some(ContinuationToken(last_id.clone()))
            }
            None => None,
        };

        Ok(ScanPage { items, next })
    }
}
