//! End-to-end flows through the public service API

use threadline_core::services::{
    add_comment_to_thread, create_thread, fetch_posts, fetch_thread_by_id, upsert_community,
    upsert_user, NewComment, NewPost, ProfileUpdate,
};
use threadline_core::{
    ErrorKind, MemoryStore, Pagination, RecordingRevalidator, Store, ThreadId, UserId,
};

fn profile(external_id: &str, name: &str) -> ProfileUpdate {
    ProfileUpdate {
        external_id: external_id.to_string(),
        username: external_id.to_string(),
        name: name.to_string(),
        image: None,
        bio: None,
        path: None,
    }
}

async fn comment(
    store: &MemoryStore,
    hook: &RecordingRevalidator,
    parent: ThreadId,
    author: UserId,
    text: &str,
) -> ThreadId {
    add_comment_to_thread(
        store,
        hook,
        NewComment {
            thread_id: parent,
            text: text.to_string(),
            author,
            path: format!("/thread/{}", parent),
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn community_post_with_reply_chain() {
    let store = MemoryStore::new();
    let hook = RecordingRevalidator::new();

    let ada = upsert_user(&store, &hook, profile("ada", "Ada")).await.unwrap();
    let bob = upsert_user(&store, &hook, profile("bob", "Bob")).await.unwrap();
    let rust = upsert_community(&store, &hook, profile("rustaceans", "Rustaceans"))
        .await
        .unwrap();

    let root = create_thread(
        &store,
        &hook,
        NewPost {
            text: "What are you building?".to_string(),
            author: ada.id,
            community_id: Some("rustaceans".to_string()),
            path: "/".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(root.community, Some(rust.id));
    let rust = store.community(rust.id).await.unwrap().unwrap();
    assert_eq!(rust.threads, vec![root.id]);
    let ada_after = store.user(ada.id).await.unwrap().unwrap();
    assert_eq!(ada_after.threads, vec![root.id]);

    // root -> a -> b -> c
    let a = comment(&store, &hook, root.id, bob.id, "a thread store").await;
    let b = comment(&store, &hook, a, ada.id, "nice").await;
    let c = comment(&store, &hook, b, bob.id, "thanks").await;

    let detail = fetch_thread_by_id(&store, root.id).await.unwrap();
    assert_eq!(detail.children.len(), 1);
    let node = &detail.children[0];
    assert_eq!(node.id, a);
    assert_eq!(node.parent_id, Some(root.id));

    let leaf = &node.children[0];
    assert_eq!(leaf.id, b);
    assert_eq!(leaf.text, "nice");
    assert_eq!(leaf.children, vec![c]);

    let feed = fetch_posts(&store, Pagination::default()).await.unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].children[0].id, a);
    assert!(!feed.has_next);

    assert_eq!(
        hook.paths(),
        vec![
            "/".to_string(),
            format!("/thread/{}", root.id),
            format!("/thread/{}", a),
            format!("/thread/{}", b),
        ]
    );
}

#[tokio::test]
async fn missing_thread_and_missing_parent_agree() {
    let store = MemoryStore::new();
    let hook = RecordingRevalidator::new();
    let ghost = ThreadId::new();

    let detail_err = fetch_thread_by_id(&store, ghost).await.unwrap_err();
    let comment_err = add_comment_to_thread(
        &store,
        &hook,
        NewComment {
            thread_id: ghost,
            text: "hello?".to_string(),
            author: UserId::new(),
            path: "/".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(detail_err.kind(), ErrorKind::NotFound);
    assert_eq!(comment_err.kind(), ErrorKind::NotFound);
    assert_eq!(detail_err.to_string(), comment_err.to_string());
}
