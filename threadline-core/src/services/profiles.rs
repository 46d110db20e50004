//! User and community profiles
//!
//! Onboarding writes (upserts keyed by external id) and the per-profile
//! thread listings shown on user and community pages.

use crate::error::{Error, Result, StorageContext};
use crate::models::{
    CommunityRecord, CommunityUpdate, DisplayName, FeedPost, ThreadId, UserRecord, UserUpdate,
    Username, ValidationError,
};
use crate::revalidate::Revalidator;
use crate::store::Store;

use super::resolve;

/// Profile fields submitted during onboarding, shared by users and communities
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    /// Cache path to revalidate after the write, if any
    pub path: Option<String>,
}

struct ValidProfile {
    external_id: String,
    username: Username,
    name: DisplayName,
    image: Option<String>,
    bio: Option<String>,
}

fn validate(update: ProfileUpdate) -> std::result::Result<(ValidProfile, Option<String>), ValidationError> {
    let external_id = update.external_id.trim();
    if external_id.is_empty() {
        return Err(ValidationError::Empty {
            field: "external id",
        });
    }

    let profile = ValidProfile {
        external_id: external_id.to_owned(),
        username: Username::new(&update.username)?,
        name: DisplayName::new(&update.name)?,
        image: update.image.filter(|s| !s.trim().is_empty()),
        bio: update.bio.filter(|s| !s.trim().is_empty()),
    };
    Ok((profile, update.path))
}

/// Insert or update a user by external id. Authored threads are kept.
#[tracing::instrument(skip(store, revalidator, update), fields(external_id = %update.external_id))]
pub async fn upsert_user(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    update: ProfileUpdate,
) -> Result<UserRecord> {
    let (profile, path) = validate(update)?;

    let user = store
        .upsert_user(UserUpdate {
            external_id: profile.external_id,
            username: profile.username,
            name: profile.name,
            image: profile.image,
            bio: profile.bio,
        })
        .await
        .during("update user")?;

    if let Some(path) = path {
        revalidator.revalidate(&path).await;
    }
    Ok(user)
}

/// Insert or update a community by external id. Posted threads are kept.
#[tracing::instrument(skip(store, revalidator, update), fields(external_id = %update.external_id))]
pub async fn upsert_community(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    update: ProfileUpdate,
) -> Result<CommunityRecord> {
    let (profile, path) = validate(update)?;

    let community = store
        .upsert_community(CommunityUpdate {
            external_id: profile.external_id,
            username: profile.username,
            name: profile.name,
            image: profile.image,
            bio: profile.bio,
        })
        .await
        .during("update community")?;

    if let Some(path) = path {
        revalidator.revalidate(&path).await;
    }
    Ok(community)
}

pub async fn fetch_user(store: &dyn Store, external_id: &str) -> Result<UserRecord> {
    store
        .user_by_external_id(external_id)
        .await
        .during("fetch user")?
        .ok_or_else(|| Error::not_found("user", external_id))
}

/// Threads authored by a user, newest first, with reply previews.
#[tracing::instrument(skip(store))]
pub async fn fetch_user_threads(store: &dyn Store, external_id: &str) -> Result<Vec<FeedPost>> {
    let user = fetch_user(store, external_id).await?;
    listed_threads(store, &user.threads, "fetch user threads").await
}

/// Threads posted under a community, newest first, with reply previews.
#[tracing::instrument(skip(store))]
pub async fn fetch_community_threads(
    store: &dyn Store,
    external_id: &str,
) -> Result<Vec<FeedPost>> {
    let community = store
        .community_by_external_id(external_id)
        .await
        .during("fetch community threads")?
        .ok_or_else(|| Error::not_found("community", external_id))?;
    listed_threads(store, &community.threads, "fetch community threads").await
}

async fn listed_threads(
    store: &dyn Store,
    ids: &[ThreadId],
    action: &'static str,
) -> Result<Vec<FeedPost>> {
    let mut records = store.threads(ids).await.during(action)?;
    // Reference sets are in push order; reversing first keeps ties newest-first.
    records.reverse();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    resolve::feed_posts(store, records).await.during(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::revalidate::{NoopRevalidator, RecordingRevalidator};
    use crate::services::{create_thread, NewPost};
    use crate::services::test_support::seed_community;
    use crate::store::MemoryStore;

    fn profile(external_id: &str, username: &str) -> ProfileUpdate {
        ProfileUpdate {
            external_id: external_id.to_string(),
            username: username.to_string(),
            name: "Ada Lovelace".to_string(),
            image: Some(String::new()),
            bio: Some("engines".to_string()),
            path: Some("/profile/edit".to_string()),
        }
    }

    #[tokio::test]
    async fn upsert_user_validates_and_revalidates() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();

        let user = upsert_user(&store, &hook, profile("user_1", "Ada"))
            .await
            .unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.image, None);
        assert!(user.onboarded);
        assert_eq!(hook.paths(), vec!["/profile/edit"]);

        let err = upsert_user(&store, &hook, profile("  ", "ada"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn username_conflict_is_storage_error() {
        let store = MemoryStore::new();
        let hook = NoopRevalidator;
        upsert_user(&store, &hook, profile("user_1", "ada")).await.unwrap();

        let err = upsert_user(&store, &hook, profile("user_2", "ada"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Storage {
                source: crate::store::StoreError::Conflict(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn fetch_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let err = fetch_user(&store, "ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn user_and_community_listings() {
        let store = MemoryStore::new();
        let hook = NoopRevalidator;
        let ada = upsert_user(&store, &hook, profile("user_1", "ada")).await.unwrap();
        seed_community(&store, "rust").await;

        let personal = create_thread(
            &store,
            &hook,
            NewPost {
                text: "personal".to_string(),
                author: ada.id,
                community_id: None,
                path: "/".to_string(),
            },
        )
        .await
        .unwrap();
        let in_community = create_thread(
            &store,
            &hook,
            NewPost {
                text: "community".to_string(),
                author: ada.id,
                community_id: Some("rust".to_string()),
                path: "/".to_string(),
            },
        )
        .await
        .unwrap();

        let mine = fetch_user_threads(&store, "user_1").await.unwrap();
        let ids: Vec<_> = mine.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![in_community.id, personal.id]);

        let theirs = fetch_community_threads(&store, "rust").await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].id, in_community.id);
        assert_eq!(theirs[0].community.as_ref().unwrap().external_id, "rust");
    }
}
