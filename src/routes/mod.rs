use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{comments::CommentStore, providers::MetadataProvider, verdict::VerdictSource},
};

pub mod comments;
pub mod titles;

/// Shared handles to the services behind the API
pub struct AppState {
    pub metadata: Arc<dyn MetadataProvider>,
    pub comments: Arc<dyn CommentStore>,
    pub verdicts: Arc<dyn VerdictSource>,
}

/// Creates the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/titles/search", get(titles::search))
        .route("/titles/:media_type/:tmdb_id", get(titles::details))
        .route("/titles/:media_type/:tmdb_id/advisory", get(titles::advisory))
        .route("/titles/:media_type/:tmdb_id/verdict", get(titles::verdict))
        .route(
            "/titles/:media_type/:tmdb_id/comments",
            get(comments::list).post(comments::create),
        )
        .route("/comments/:comment_id/vote", post(comments::vote))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
