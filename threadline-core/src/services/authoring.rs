//! Top-level thread creation

use crate::error::{Result, StorageContext};
use crate::models::{NewThread, ThreadRecord, ThreadText, UserId};
use crate::revalidate::Revalidator;
use crate::store::Store;

use super::saga::{Saga, Undo};

const ACTION: &str = "create thread";

/// Input for [`create_thread`]
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author: UserId,
    /// External id of the community to post under, if any
    pub community_id: Option<String>,
    /// Cache path to revalidate once the thread is linked
    pub path: String,
}

/// Create a top-level thread and link it from its author and community.
///
/// An unknown `community_id` silently yields a personal post. The writes run
/// as a saga: if linking fails, earlier writes are undone before the error
/// is returned, and the revalidator is only called after every write succeeded.
#[tracing::instrument(skip(store, revalidator, post), fields(author = %post.author))]
pub async fn create_thread(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    post: NewPost,
) -> Result<ThreadRecord> {
    let text = ThreadText::new(&post.text)?;

    let community = match post.community_id.as_deref() {
        Some(external_id) => {
            let found = store
                .community_by_external_id(external_id)
                .await
                .during(ACTION)?;
            if found.is_none() {
                tracing::debug!(external_id, "community not found, posting as personal thread");
            }
            found
        }
        None => None,
    };

    let mut saga = Saga::new(store, ACTION);

    let thread = saga
        .step(store.insert_thread(NewThread {
            text,
            author: post.author,
            community: community.as_ref().map(|c| c.id),
            parent_id: None,
        }))
        .await?;
    saga.completed(Undo::DeleteThread(thread.id));

    if saga
        .step(store.push_user_thread(post.author, thread.id))
        .await?
    {
        saga.completed(Undo::PullUserThread(post.author, thread.id));
    } else {
        tracing::warn!(thread = %thread.id, "author not found, thread left unlinked from user");
    }

    if let Some(community) = &community {
        if saga
            .step(store.push_community_thread(community.id, thread.id))
            .await?
        {
            saga.completed(Undo::PullCommunityThread(community.id, thread.id));
        }
    }

    revalidator.revalidate(&post.path).await;
    tracing::info!(thread = %thread.id, "thread created");

    Ok(thread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::revalidate::RecordingRevalidator;
    use crate::services::test_support::{seed_community, seed_user};
    use crate::store::MemoryStore;

    fn new_post(author: UserId, community_id: Option<&str>) -> NewPost {
        NewPost {
            text: "Hello, threads".to_string(),
            author,
            community_id: community_id.map(str::to_string),
            path: "/".to_string(),
        }
    }

    #[tokio::test]
    async fn personal_post_links_author() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();
        let ada = seed_user(&store, "ada", "Ada").await;

        let thread = create_thread(&store, &hook, new_post(ada.id, None))
            .await
            .unwrap();

        assert_eq!(thread.text, "Hello, threads");
        assert_eq!(thread.community, None);
        assert_eq!(thread.parent_id, None);
        let ada = store.user(ada.id).await.unwrap().unwrap();
        assert_eq!(ada.threads, vec![thread.id]);
        assert_eq!(hook.paths(), vec!["/"]);
    }

    #[tokio::test]
    async fn community_post_links_everything() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();
        let ada = seed_user(&store, "ada", "Ada").await;
        let rust = seed_community(&store, "rust").await;

        let thread = create_thread(&store, &hook, new_post(ada.id, Some("rust")))
            .await
            .unwrap();

        assert_eq!(thread.community, Some(rust.id));
        let rust = store.community(rust.id).await.unwrap().unwrap();
        assert_eq!(rust.threads, vec![thread.id]);
        let ada = store.user(ada.id).await.unwrap().unwrap();
        assert_eq!(ada.threads, vec![thread.id]);
    }

    #[tokio::test]
    async fn unknown_community_falls_back_to_personal() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();
        let ada = seed_user(&store, "ada", "Ada").await;

        let thread = create_thread(&store, &hook, new_post(ada.id, Some("nope")))
            .await
            .unwrap();
        assert_eq!(thread.community, None);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_write() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();
        let ada = seed_user(&store, "ada", "Ada").await;

        let mut post = new_post(ada.id, None);
        post.text = "   ".to_string();
        let err = create_thread(&store, &hook, post).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.thread_count().await, 0);
        assert!(hook.paths().is_empty());
    }

    #[tokio::test]
    async fn failed_author_link_deletes_thread() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();
        let ada = seed_user(&store, "ada", "Ada").await;
        store.fail_on("push_user_thread");

        let err = create_thread(&store, &hook, new_post(ada.id, None))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("failed to create thread"));
        assert!(err.to_string().contains("push_user_thread"));
        assert_eq!(store.thread_count().await, 0);
        assert!(hook.paths().is_empty());
    }

    #[tokio::test]
    async fn failed_community_link_unwinds_author_link() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();
        let ada = seed_user(&store, "ada", "Ada").await;
        seed_community(&store, "rust").await;
        store.fail_on("push_community_thread");

        let err = create_thread(&store, &hook, new_post(ada.id, Some("rust")))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(store.thread_count().await, 0);
        let ada = store.user(ada.id).await.unwrap().unwrap();
        assert!(ada.threads.is_empty());
    }

    #[tokio::test]
    async fn unknown_author_still_creates_thread() {
        let store = MemoryStore::new();
        let hook = RecordingRevalidator::new();

        let thread = create_thread(&store, &hook, new_post(UserId::new(), None))
            .await
            .unwrap();
        assert!(store.thread(thread.id).await.unwrap().is_some());
    }
}
