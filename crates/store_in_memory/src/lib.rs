use async_trait::async_trait;
use model::{FEEDBACKS_ID, Feedback};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::{Arc, Mutex, MutexGuard};
use store::StoreErrorReason::{BackendFailure, BadState, MissingEntry};
use store::StoreOperation::{DeleteFeedback, GetFeedback, PutFeedback, Scan, UpdateAttribute};
use store::{ContinuationToken, FeedbackStore, ScanPage, StoreError, StoreOperation};

/// Feedback store held in process memory.
///
/// Records are kept ordered by id so scans are stable across pages.
/// With a page size set, scans behave like DynamoDB with a `Limit`: a full
/// page always carries a continuation token, even when nothing follows it.
#[derive(Clone, Default)]
pub struct InMemoryFeedbackStore {
    records: Arc<Mutex<BTreeMap<String, Feedback>>>,
    page_size: Option<usize>,
}

impl InMemoryFeedbackStore {
    pub fn with_page_size(page_size: usize) -> Self {
        InMemoryFeedbackStore {
            records: Default::default(),
            page_size: Some(page_size.max(1)),
        }
    }

    fn records(
        &self,
        feedbacks_id: &str,
        operation: StoreOperation,
    ) -> Result<MutexGuard<'_, BTreeMap<String, Feedback>>, StoreError> {
        self.records.lock().map_err(|err| {
            StoreError::new(
                feedbacks_id.to_string(),
                operation,
                BackendFailure(err.to_string().into()),
            )
        })
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn get_feedback(&self, feedbacks_id: &str) -> Result<Option<Feedback>, StoreError> {
        let records = self.records(feedbacks_id, GetFeedback)?;

        Ok(records.get(feedbacks_id).cloned())
    }

    async fn put_feedback(&self, feedback: Feedback) -> Result<(), StoreError> {
        self.records(&feedback.feedbacks_id, PutFeedback)?
            .insert(feedback.feedbacks_id.clone(), feedback);

        Ok(())
    }

    async fn update_attribute(
        &self,
        feedbacks_id: &str,
        key: &str,
        value: Value,
    ) -> Result<Map<String, Value>, StoreError> {
        if key == FEEDBACKS_ID {
            return Err(StoreError::new(
                feedbacks_id.to_string(),
                UpdateAttribute,
                BadState(format!("{} cannot be updated", FEEDBACKS_ID)),
            ));
        }

        let mut records = self.records(feedbacks_id, UpdateAttribute)?;
        let feedback: &mut Feedback = records.get_mut(feedbacks_id).ok_or_else(|| {
            StoreError::new(feedbacks_id.to_string(), UpdateAttribute, MissingEntry)
        })?;

        feedback.attributes.insert(key.to_string(), value.clone());

        let mut updated: Map<String, Value> = Map::new();
        updated.insert(key.to_string(), value);

        Ok(updated)
    }

    async fn delete_feedback(&self, feedbacks_id: &str) -> Result<Option<Feedback>, StoreError> {
        let mut records = self.records(feedbacks_id, DeleteFeedback)?;

        Ok(records.remove(feedbacks_id))
    }

    async fn scan_page(&self, start: Option<ContinuationToken>) -> Result<ScanPage, StoreError> {
        let records = self.records("", Scan)?;

        let lower = match &start {
            Some(ContinuationToken(last_key)) => Excluded(last_key.clone()),
            None => Unbounded,
        };
        let limit: usize = self.page_size.unwrap_or(usize::MAX);

        let items: Vec<Feedback> = records
            .range((lower, Unbounded))
            .take(limit)
            .map(|(_, feedback)| feedback.clone())
            .collect();

        let next: Option<ContinuationToken> = match items.last() {
            Some(last) if items.len() == limit => {
                Some(ContinuationToken(last.feedbacks_id.clone()))
            }
            _ => None,
        };

        Ok(ScanPage { items, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_replaces_existing_record() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::default();

        store
            .put_feedback(Feedback::new("f1").with_attribute("rating", json!(1)))
            .await
            .expect("Put should succeed");
        store
            .put_feedback(Feedback::new("f1").with_attribute("comment", json!("great")))
            .await
            .expect("Put should succeed");

        let feedback: Feedback = store
            .get_feedback("f1")
            .await
            .expect("Get should succeed")
            .expect("Record should exist");

        // The whole item is replaced, not merged
        assert_eq!(Feedback::new("f1").with_attribute("comment", json!("great")), feedback);
    }

    #[tokio::test]
    async fn update_fails_for_missing_record() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::default();

        let err: StoreError = store
            .update_attribute("missing", "rating", json!(2))
            .await
            .expect_err("Update of a missing record should fail");

        assert!(err.is_missing_entry());
        assert_eq!(UpdateAttribute, err.operation);
    }

    #[tokio::test]
    async fn update_sets_single_attribute() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::default();
        store
            .put_feedback(
                Feedback::new("f1")
                    .with_attribute("rating", json!(1))
                    .with_attribute("comment", json!("ok")),
            )
            .await
            .unwrap();

        let updated: Map<String, Value> = store
            .update_attribute("f1", "rating", json!(4))
            .await
            .expect("Update should succeed");

        assert_eq!(json!({"rating": 4}), Value::Object(updated));

        let feedback: Feedback = store.get_feedback("f1").await.unwrap().unwrap();
        assert_eq!(Some(&json!(4)), feedback.attributes.get("rating"));
        assert_eq!(Some(&json!("ok")), feedback.attributes.get("comment"));
    }

    #[tokio::test]
    async fn update_rejects_partition_key() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::default();
        store.put_feedback(Feedback::new("f1")).await.unwrap();

        let err: StoreError = store
            .update_attribute("f1", FEEDBACKS_ID, json!("f2"))
            .await
            .expect_err("Partition key update should fail");

        assert!(matches!(err.reason, BadState(_)));
    }

    #[tokio::test]
    async fn delete_returns_previous_record() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::default();
        store.put_feedback(Feedback::new("f1")).await.unwrap();

        let deleted: Option<Feedback> = store.delete_feedback("f1").await.unwrap();
        assert_eq!(Some(Feedback::new("f1")), deleted);

        let deleted_again: Option<Feedback> = store.delete_feedback("f1").await.unwrap();
        assert_eq!(None, deleted_again);
    }

    #[tokio::test]
    async fn scan_pages_carry_token_until_exhausted() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::with_page_size(2);
        for id in ["c", "a", "b"] {
            store.put_feedback(Feedback::new(id)).await.unwrap();
        }

        let first: ScanPage = store.scan_page(None).await.unwrap();
        let ids: Vec<&str> = first.items.iter().map(|f| f.feedbacks_id.as_str()).collect();
        assert_eq!(vec!["a", "b"], ids);
        assert_eq!(Some(ContinuationToken("b".to_string())), first.next);

        let second: ScanPage = store.scan_page(first.next).await.unwrap();
        assert_eq!(1, second.items.len());
        assert_eq!("c", second.items[0].feedbacks_id);
        assert_eq!(None, second.next);
    }

    #[tokio::test]
    async fn unpaged_scan_returns_everything_at_once() {
        let store: InMemoryFeedbackStore = InMemoryFeedbackStore::default();
        for id in ["a", "b", "c"] {
            store.put_feedback(Feedback::new(id)).await.unwrap();
        }

        let page: ScanPage = store.scan_page(None).await.unwrap();

        assert_eq!(3, page.items.len());
        assert_eq!(None, page.next);
    }
}
