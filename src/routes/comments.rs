use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Comment, MediaType, NewComment, ThreadedComment, TitleKey, VoteDirection},
    routes::AppState,
    services::comments,
};

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

/// Handler for a title's threaded reviews
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path((media_type, tmdb_id)): Path<(MediaType, i64)>,
) -> AppResult<Json<Vec<ThreadedComment>>> {
    let key = TitleKey::new(media_type, tmdb_id);
    let threads = comments::threads_for_title(state.comments.as_ref(), &key).await?;
    Ok(Json(threads))
}

/// Handler for posting a review or reply
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((media_type, tmdb_id)): Path<(MediaType, i64)>,
    Json(request): Json<NewComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let key = TitleKey::new(media_type, tmdb_id);

    tracing::info!(
        request_id = %request_id,
        title = %key,
        is_reply = request.parent_id.is_some(),
        "Processing comment submission"
    );

    let comment = comments::post_comment(state.comments.as_ref(), &key, request).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Handler for up/down votes
pub async fn vote(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
    Json(request): Json<VoteRequest>,
) -> AppResult<Json<Comment>> {
    let comment = comments::vote(state.comments.as_ref(), comment_id, request.direction).await?;
    Ok(Json(comment))
}
