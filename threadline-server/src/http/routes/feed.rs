//! Home feed endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use threadline_core::services::fetch_posts;
use threadline_core::{FeedPage, FeedPost, Pagination, PaginationParams};

use crate::http::error::ApiError;
use crate::state::AppState;

/// GET /api/feed?page=&per_page= - top-level threads, newest first
async fn feed(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<FeedPage<FeedPost>>, ApiError> {
    let page = fetch_posts(state.store(), Pagination::from(params)).await?;
    Ok(Json(page))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/feed", get(feed))
}
