use async_trait::async_trait;
use model::{Error, Feedback};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Storage for feedback records, addressed by `FEEDBACKS_ID`.
///
/// Every method maps to exactly one request against the backing store.
/// Reading the whole table is done page by page with `scan_page`.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Point lookup. `None` when no record has the id.
    async fn get_feedback(&self, feedbacks_id: &str) -> Result<Option<Feedback>, StoreError>;

    /// Unconditional write, replacing any record with the same id.
    async fn put_feedback(&self, feedback: Feedback) -> Result<(), StoreError>;

    /// Set a single attribute on an existing record.
    /// Returns the new values of the updated attributes.
    async fn update_attribute(
        &self,
        feedbacks_id: &str,
        key: &str,
        value: Value,
    ) -> Result<Map<String, Value>, StoreError>;

    /// Remove a record, returning it if it existed.
    async fn delete_feedback(&self, feedbacks_id: &str) -> Result<Option<Feedback>, StoreError>;

    /// Read one page of the table starting after `start`.
    async fn scan_page(&self, start: Option<ContinuationToken>) -> Result<ScanPage, StoreError>;
}

/// Opaque cursor marking where the next scan page begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(pub String);

#[derive(Debug, Default)]
pub struct ScanPage {
    pub items: Vec<Feedback>,
    // No token means the scan is complete
    pub next: Option<ContinuationToken>,
}

/// Errors arising from the feedback store.
#[derive(Debug)]
pub struct StoreError {
    pub feedbacks_id: String,

    pub operation: StoreOperation,
    pub reason: StoreErrorReason,
}

#[derive(Debug)]
pub enum StoreErrorReason {
    // The addressed record doesn't exist
    MissingEntry,
    // The stored or submitted value couldn't be converted
    BadState(String),
    // An error from the underlying store
    BackendFailure(Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreOperation {
    GetFeedback,
    PutFeedback,
    UpdateAttribute,
    DeleteFeedback,
    Scan,
}

impl StoreError {
    pub fn new(feedbacks_id: String, operation: StoreOperation, reason: StoreErrorReason) -> Self {
        StoreError {
            feedbacks_id,
            operation,
            reason,
        }
    }

    pub fn is_missing_entry(&self) -> bool {
        matches!(self.reason, StoreErrorReason::MissingEntry)
    }
}

impl Display for StoreErrorReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreErrorReason::MissingEntry => f.write_str("no such entry"),
            StoreErrorReason::BadState(detail) => write!(f, "bad state: {detail}"),
            StoreErrorReason::BackendFailure(err) => write!(f, "backend failure: {err}"),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} failed for [{}]: {}",
            self.operation, self.feedbacks_id, self.reason
        )
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_names_operation_and_key() {
        let err: StoreError = StoreError::new(
            "f1".to_string(),
            StoreOperation::DeleteFeedback,
            StoreErrorReason::MissingEntry,
        );

        assert_eq!("DeleteFeedback failed for [f1]: no such entry", err.to_string());
        assert!(err.is_missing_entry());
    }

    #[test]
    fn backend_failure_is_not_missing_entry() {
        let err: StoreError = StoreError::new(
            String::new(),
            StoreOperation::Scan,
            StoreErrorReason::BackendFailure("throttled".into()),
        );

        assert!(!err.is_missing_entry());
        assert!(err.to_string().contains("throttled"));
    }
}
