use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ContentAdvisory, MediaType, Title, TitleDetails, TitleKey, ViewingVerdict},
    routes::AppState,
    services::catalog,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Title>>> {
    let titles = catalog::search_titles(state.metadata.as_ref(), &params.q).await?;
    Ok(Json(titles))
}

/// Handler for title details, including certification and parental guide
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path((media_type, tmdb_id)): Path<(MediaType, i64)>,
) -> AppResult<Json<TitleDetails>> {
    let key = TitleKey::new(media_type, tmdb_id);
    let details = catalog::title_details(state.metadata.as_ref(), &key).await?;
    Ok(Json(details))
}

/// Handler for the parental guide of a title
pub async fn advisory(
    State(state): State<Arc<AppState>>,
    Path((media_type, tmdb_id)): Path<(MediaType, i64)>,
) -> AppResult<Json<ContentAdvisory>> {
    let key = TitleKey::new(media_type, tmdb_id);
    let advisory = catalog::title_advisory(state.metadata.as_ref(), &key).await?;
    Ok(Json(advisory))
}

/// Handler for the theater-or-stream verdict
pub async fn verdict(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((media_type, tmdb_id)): Path<(MediaType, i64)>,
) -> AppResult<Json<ViewingVerdict>> {
    let key = TitleKey::new(media_type, tmdb_id);
    let metadata = state.metadata.fetch_metadata(&key).await?;

    tracing::info!(
        request_id = %request_id,
        title = %key,
        name = %metadata.title.title,
        "Processing verdict request"
    );

    let verdict = state.verdicts.verdict(&key, &metadata.title.title).await?;

    tracing::info!(
        request_id = %request_id,
        title = %key,
        is_fallback = verdict.is_fallback,
        "Verdict completed"
    );

    Ok(Json(verdict))
}
