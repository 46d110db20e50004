//! User and community profile endpoints

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use threadline_core::services::{
    fetch_community_threads, fetch_user, fetch_user_threads, upsert_community, upsert_user,
    ProfileUpdate,
};
use threadline_core::{CommunityRecord, FeedPost, UserRecord};

use crate::http::error::ApiError;
use crate::state::AppState;

/// Onboarding request body; the external id comes from the path
#[derive(Deserialize)]
pub struct ProfileRequest {
    pub username: String,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub path: Option<String>,
}

impl ProfileRequest {
    fn into_update(self, external_id: String) -> ProfileUpdate {
        ProfileUpdate {
            external_id,
            username: self.username,
            name: self.name,
            image: self.image,
            bio: self.bio,
            path: self.path,
        }
    }
}

/// PUT /api/users/{external_id}
async fn put_user(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    let user = upsert_user(
        state.store(),
        state.revalidator(),
        req.into_update(external_id),
    )
    .await?;
    Ok(Json(user))
}

/// GET /api/users/{external_id}
async fn get_user(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    Ok(Json(fetch_user(state.store(), &external_id).await?))
}

/// GET /api/users/{external_id}/threads
async fn user_threads(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<Vec<FeedPost>>, ApiError> {
    Ok(Json(fetch_user_threads(state.store(), &external_id).await?))
}

/// PUT /api/communities/{external_id}
async fn put_community(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<CommunityRecord>, ApiError> {
    let community = upsert_community(
        state.store(),
        state.revalidator(),
        req.into_update(external_id),
    )
    .await?;
    Ok(Json(community))
}

/// GET /api/communities/{external_id}/threads
async fn community_threads(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<Vec<FeedPost>>, ApiError> {
    Ok(Json(
        fetch_community_threads(state.store(), &external_id).await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/{external_id}", put(put_user).get(get_user))
        .route("/api/users/{external_id}/threads", get(user_threads))
        .route("/api/communities/{external_id}", put(put_community))
        .route(
            "/api/communities/{external_id}/threads",
            get(community_threads),
        )
}

#[cfg(test)]
mod tests {
    use crate::http::routes::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn onboarding_is_idempotent_and_keeps_threads() {
        let app = TestApp::new();
        let author = app.user("ada").await;
        let (status, _) = app
            .request(
                Method::POST,
                "/api/threads",
                Some(json!({ "text": "first", "author": author })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, user) = app
            .request(
                Method::PUT,
                "/api/users/ada",
                Some(json!({
                    "username": "ada",
                    "name": "Ada Lovelace",
                    "bio": "analyst",
                    "path": "/profile/ada"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["id"], json!(author));
        assert_eq!(user["name"], "Ada Lovelace");
        assert_eq!(user["onboarded"], true);
        assert_eq!(user["threads"].as_array().unwrap().len(), 1);
        assert!(app.revalidator.paths().contains(&"/profile/ada".to_string()));

        let (status, threads) = app
            .request(Method::GET, "/api/users/ada/threads", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(threads[0]["text"], "first");
        assert_eq!(threads[0]["author"]["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn taken_username_is_409() {
        let app = TestApp::new();
        app.user("ada").await;
        let (status, body) = app
            .request(
                Method::PUT,
                "/api/users/someone_else",
                Some(json!({ "username": "ada", "name": "Impostor" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn invalid_username_is_400() {
        let app = TestApp::new();
        let (status, _) = app
            .request(
                Method::PUT,
                "/api/users/ada",
                Some(json!({ "username": "no spaces", "name": "Ada" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn community_posts_are_listed() {
        let app = TestApp::new();
        let author = app.user("ada").await;
        let (status, _) = app
            .request(
                Method::PUT,
                "/api/communities/org_rust",
                Some(json!({ "username": "rustaceans", "name": "Rustaceans" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        app.request(
            Method::POST,
            "/api/threads",
            Some(json!({ "text": "hello crabs", "author": author, "community_id": "org_rust" })),
        )
        .await;
        app.request(
            Method::POST,
            "/api/threads",
            Some(json!({ "text": "personal", "author": author })),
        )
        .await;

        let (status, threads) = app
            .request(Method::GET, "/api/communities/org_rust/threads", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let threads = threads.as_array().unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0]["community"]["name"], "Rustaceans");
    }

    #[tokio::test]
    async fn unknown_profiles_are_404() {
        let app = TestApp::new();
        let (status, _) = app.request(Method::GET, "/api/users/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .request(Method::GET, "/api/communities/ghost/threads", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
