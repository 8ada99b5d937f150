use aws_sdk_dynamodb::types::AttributeValue;
use model::{FEEDBACKS_ID, Feedback};
use model::env::{FEEDBACK_CONSISTENT_READ, FEEDBACK_SCAN_PAGE_SIZE, FEEDBACK_TABLE_NAME};
use std::collections::HashMap;
use std::env;

/// Test table values
pub const TEST_TABLE: &str = "test_feedbacks";
pub const TEST_PAGE_SIZE: i32 = 25;

/// Setup default environment variables used in testing
pub fn setup_default_env() {
    unsafe {
        env::set_var(FEEDBACK_TABLE_NAME, TEST_TABLE);
        env::set_var(FEEDBACK_CONSISTENT_READ, "true");
        env::set_var(FEEDBACK_SCAN_PAGE_SIZE, TEST_PAGE_SIZE.to_string());
    }
}

/// DynamoDB key addressing a single feedback record
pub fn dynamodb_key(feedbacks_id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(
        FEEDBACKS_ID.to_string(),
        AttributeValue::S(feedbacks_id.to_string()),
    )])
}

/// DynamoDB item for a feedback record carrying a numeric rating
pub fn dynamodb_item(feedbacks_id: &str, rating: i64) -> HashMap<String, AttributeValue> {
    let mut item: HashMap<String, AttributeValue> = dynamodb_key(feedbacks_id);
    item.insert("rating".to_string(), AttributeValue::N(rating.to_string()));

    item
}

/// Feedback record carrying a numeric rating, matching `dynamodb_item`
pub fn feedback_with_rating(feedbacks_id: &str, rating: i64) -> Feedback {
    Feedback::new(feedbacks_id).with_attribute("rating", serde_json::json!(rating))
}
