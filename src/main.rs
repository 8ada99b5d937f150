use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_runtime::{LambdaEvent, service_fn, tracing};
use model::Error;
use model::env::DEFAULT_REGION;
use router::feedback_fn;
use std::sync::Arc;
use store::FeedbackStore;
use store_dynamodb::DynamoDbFeedbackStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let region_provider: RegionProviderChain =
        RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    let dynamodb_client: aws_sdk_dynamodb::Client = aws_sdk_dynamodb::Client::new(&sdk_config);
    let feedback_store: DynamoDbFeedbackStore = DynamoDbFeedbackStore::from_env(dynamodb_client)?;

    tracing::info!("Serving feedback from table {}", feedback_store.table_name());

    // Built once and shared by every invocation
    let store: Arc<dyn FeedbackStore> = Arc::new(feedback_store);

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ApiGatewayProxyRequest>| {
            let store: Arc<dyn FeedbackStore> = store.clone();

            async move { feedback_fn(store.as_ref(), event).await }
        },
    ))
    .await
}
