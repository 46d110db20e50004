//! Thread endpoints: authoring, detail and comments

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use threadline_core::services::{
    add_comment_to_thread, create_thread, fetch_thread_by_id, NewComment, NewPost,
};
use threadline_core::{ThreadDetail, ThreadRecord, UserId};

use crate::http::error::ApiError;
use crate::http::extractors::ValidThreadId;
use crate::state::AppState;

/// Create thread request
#[derive(Deserialize)]
pub struct CreateThreadRequest {
    pub text: String,
    pub author: UserId,
    /// External id of the community to post under
    pub community_id: Option<String>,
    /// Path to revalidate, defaults to the feed
    pub path: Option<String>,
}

/// Comment request
#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: String,
    pub author: UserId,
    pub path: Option<String>,
}

/// POST /api/threads - create a top-level thread
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateThreadRequest>,
) -> Result<(StatusCode, Json<ThreadRecord>), ApiError> {
    let thread = create_thread(
        state.store(),
        state.revalidator(),
        NewPost {
            text: req.text,
            author: req.author,
            community_id: req.community_id,
            path: req.path.unwrap_or_else(|| "/".to_string()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// GET /api/threads/{id} - thread with two levels of replies
async fn detail(
    State(state): State<AppState>,
    ValidThreadId(id): ValidThreadId,
) -> Result<Json<ThreadDetail>, ApiError> {
    Ok(Json(fetch_thread_by_id(state.store(), id).await?))
}

/// POST /api/threads/{id}/comments - reply to a thread
async fn comment(
    State(state): State<AppState>,
    ValidThreadId(id): ValidThreadId,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<ThreadRecord>), ApiError> {
    let reply = add_comment_to_thread(
        state.store(),
        state.revalidator(),
        NewComment {
            thread_id: id,
            text: req.text,
            author: req.author,
            path: req.path.unwrap_or_else(|| format!("/thread/{}", id)),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(reply)))
}

/// Thread routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/threads", post(create))
        .route("/api/threads/{id}", get(detail))
        .route("/api/threads/{id}/comments", post(comment))
}
