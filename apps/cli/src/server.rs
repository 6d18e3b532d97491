use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use quillfeed::FeedBuilder;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const FEED_ROUTE: &str = "/feed.xml";
pub const XML_CONTENT_TYPE: &str = "application/xml";

#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<FeedBuilder>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(FEED_ROUTE, get(feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Rebuilds the feed from disk on every request.
pub async fn feed(State(state): State<AppState>) -> Response {
    let builder = state.builder.clone();

    match tokio::task::spawn_blocking(move || builder.build()).await {
        Ok(Ok(xml)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
            xml,
        )
            .into_response(),
        Ok(Err(error)) => {
            tracing::error!("Failed to build feed: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build feed").into_response()
        }
        Err(error) => {
            tracing::error!("Feed task failed: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
