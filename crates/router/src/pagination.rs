use lambda_runtime::tracing;
use model::Feedback;
use store::{ContinuationToken, FeedbackStore, ScanPage, StoreError};

/// Read every record from the store, following continuation tokens page by page.
///
/// Items keep the order the store returns them in. Any failing page aborts
/// the scan and the items gathered so far are dropped.
pub async fn scan_all(store: &dyn FeedbackStore) -> Result<Vec<Feedback>, StoreError> {
    let mut feedbacks: Vec<Feedback> = Vec::new();
    let mut cursor: Option<ContinuationToken> = None;
    let mut pages: usize = 0;

    loop {
        let page: ScanPage = store.scan_page(cursor.take()).await?;
        pages += 1;

        tracing::debug!(page = pages, items = page.items.len(), "Scanned feedback page");

        feedbacks.extend(page.items);

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::info!("Scanned {} feedbacks over {} pages", feedbacks.len(), pages);

    Ok(feedbacks)
}
