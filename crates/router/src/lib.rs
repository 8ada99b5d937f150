use crate::request::FeedbackRequest;
use crate::response::ResponseEnvelope;
use crate::route::Route;
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_runtime::tracing::{Instrument, Span};
use lambda_runtime::{LambdaEvent, tracing};
use model::Error;
use store::FeedbackStore;

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod request;
pub mod response;
pub mod route;

pub use crate::error::ApiError;

/// Handler for API Gateway proxy events designed for use with `lambda_runtime::run()`.
///
/// Every request is answered with a `ResponseEnvelope`; failures of a single
/// request are reported in the envelope rather than failing the invocation.
///
/// ```ignore
/// let store: Arc<dyn FeedbackStore> = Arc::new(InMemoryFeedbackStore::default());
///
/// lambda_runtime::run(service_fn(async |event: LambdaEvent<ApiGatewayProxyRequest>| {
///     feedback_fn(store.as_ref(), event).await
/// }))
/// .await?;
/// ```
pub async fn feedback_fn(
    store: &dyn FeedbackStore,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ResponseEnvelope, Error> {
    let request: FeedbackRequest = event.payload.into();

    Ok(route_request(store, request).await)
}

/// Dispatch a request to the handler selected by its method and path.
pub async fn route_request(store: &dyn FeedbackStore, request: FeedbackRequest) -> ResponseEnvelope {
    let request_span: Span = tracing::span!(
        tracing::Level::INFO,
        "Feedback request",
        method = %request.method,
        path = %request.path
    );

    dispatch(store, request).instrument(request_span).await
}

async fn dispatch(store: &dyn FeedbackStore, request: FeedbackRequest) -> ResponseEnvelope {
    tracing::info!("Request event: {:?}", request);

    let Some(route) = Route::resolve(&request.method, &request.path) else {
        tracing::warn!("No route for {} {}", request.method, request.path);

        return response::not_found();
    };

    tracing::debug!("Selected route {:?}", route);

    let result: Result<ResponseEnvelope, ApiError> = match route {
        Route::FetchOne => handlers::fetch_one(store, &request).await,
        Route::FetchAll => handlers::fetch_all(store).await,
        Route::Create => handlers::create(store, &request).await,
        Route::Replace => handlers::replace(store, &request).await,
        Route::PartialUpdate => handlers::partial_update(store, &request).await,
        Route::Delete => handlers::delete(store, &request).await,
    };

    result.unwrap_or_else(|err| {
        match &err {
            ApiError::Store(store_err) => tracing::error!("{:?} failed: {}", route, store_err),
            _ => tracing::warn!("{:?} rejected: {}", route, err),
        }

        err.into_response()
    })
}
