use crate::error::ApiError;
use crate::pagination::scan_all;
use crate::request::FeedbackRequest;
use crate::response::{ResponseEnvelope, build_response};
use lambda_runtime::tracing;
use model::{FEEDBACKS_ID, Feedback};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::FeedbackStore;

pub const SAVE_MESSAGE: &str = "Feedback has been successfully saved.";
pub const REPLACE_MESSAGE: &str = "Feedback has been successfully updated.";
pub const MODIFY_MESSAGE: &str = "Feedback updated successfully.";
pub const DELETE_MESSAGE: &str = "Feedback has been successfully deleted.";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ItemBody {
    operation: &'static str,
    message: &'static str,
    item: Feedback,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdatedAttributesBody {
    operation: &'static str,
    message: &'static str,
    updated_attributes: Map<String, Value>,
}

#[derive(Serialize)]
struct FeedbacksBody {
    feedbacks: Vec<Feedback>,
}

#[derive(Deserialize)]
struct IdBody {
    #[serde(rename = "FEEDBACKS_ID")]
    feedbacks_id: String,
}

/// Body of a partial update, naming the single attribute to set.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModifyBody {
    #[serde(rename = "FEEDBACKS_ID")]
    feedbacks_id: String,
    update_key: String,
    update_value: Value,
}

/// Table keys must be non-blank strings.
fn require_id(feedbacks_id: &str) -> Result<&str, ApiError> {
    if feedbacks_id.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} must not be empty", FEEDBACKS_ID)));
    }

    Ok(feedbacks_id)
}

pub async fn fetch_one(
    store: &dyn FeedbackStore,
    request: &FeedbackRequest,
) -> Result<ResponseEnvelope, ApiError> {
    let feedbacks_id: &str = request.query_param(FEEDBACKS_ID).ok_or_else(|| {
        ApiError::Validation(format!("Query parameter {} is required", FEEDBACKS_ID))
    })?;
    let feedbacks_id: &str = require_id(feedbacks_id)?;

    let feedback: Feedback = store
        .get_feedback(feedbacks_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Feedback {} not found", feedbacks_id)))?;

    Ok(build_response(200, &feedback))
}

pub async fn fetch_all(store: &dyn FeedbackStore) -> Result<ResponseEnvelope, ApiError> {
    let feedbacks: Vec<Feedback> = scan_all(store).await?;

    Ok(build_response(200, &FeedbacksBody { feedbacks }))
}

pub async fn create(
    store: &dyn FeedbackStore,
    request: &FeedbackRequest,
) -> Result<ResponseEnvelope, ApiError> {
    put(store, request, "SAVE", SAVE_MESSAGE).await
}

pub async fn replace(
    store: &dyn FeedbackStore,
    request: &FeedbackRequest,
) -> Result<ResponseEnvelope, ApiError> {
    put(store, request, "UPDATE", REPLACE_MESSAGE).await
}

// Create and replace share the same unconditional write
async fn put(
    store: &dyn FeedbackStore,
    request: &FeedbackRequest,
    operation: &'static str,
    message: &'static str,
) -> Result<ResponseEnvelope, ApiError> {
    let feedback: Feedback = request.json_body()?;
    require_id(&feedback.feedbacks_id)?;

    store.put_feedback(feedback.clone()).await?;

    Ok(build_response(
        200,
        &ItemBody {
            operation,
            message,
            item: feedback,
        },
    ))
}

pub async fn partial_update(
    store: &dyn FeedbackStore,
    request: &FeedbackRequest,
) -> Result<ResponseEnvelope, ApiError> {
    let body: ModifyBody = request.json_body()?;
    require_id(&body.feedbacks_id)?;

    if body.update_key.is_empty() {
        return Err(ApiError::Validation("updateKey must not be empty".to_string()));
    }
    if body.update_key == FEEDBACKS_ID {
        return Err(ApiError::Validation(format!("{} cannot be updated", FEEDBACKS_ID)));
    }

    tracing::debug!(
        feedbacks_id = %body.feedbacks_id,
        update_key = %body.update_key,
        "Updating feedback attribute"
    );

    let updated_attributes: Map<String, Value> = store
        .update_attribute(&body.feedbacks_id, &body.update_key, body.update_value)
        .await?;

    Ok(build_response(
        200,
        &UpdatedAttributesBody {
            operation: "UPDATE",
            message: MODIFY_MESSAGE,
            updated_attributes,
        },
    ))
}

pub async fn delete(
    store: &dyn FeedbackStore,
    request: &FeedbackRequest,
) -> Result<ResponseEnvelope, ApiError> {
    let body: IdBody = request.json_body()?;
    require_id(&body.feedbacks_id)?;

    let feedback: Feedback = store
        .delete_feedback(&body.feedbacks_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Feedback {} not found", body.feedbacks_id)))?;

    Ok(build_response(
        200,
        &ItemBody {
            operation: "DELETE",
            message: DELETE_MESSAGE,
            item: feedback,
        },
    ))
}
