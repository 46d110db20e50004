use proptest::prelude::*;
use threadline_core::services::{add_comment_to_thread, create_thread, fetch_posts, NewComment, NewPost};
use threadline_core::{MemoryStore, NoopRevalidator, Pagination, ThreadId, UserId};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Seed `posts` top-level threads and `replies` comments spread over them.
async fn seeded(posts: usize, replies: usize) -> (MemoryStore, Vec<ThreadId>) {
    let store = MemoryStore::new();
    let author = UserId::new();
    let mut ids = Vec::with_capacity(posts);

    for i in 0..posts {
        let thread = create_thread(
            &store,
            &NoopRevalidator,
            NewPost {
                text: format!("post {}", i),
                author,
                community_id: None,
                path: "/".to_string(),
            },
        )
        .await
        .unwrap();
        ids.push(thread.id);
    }

    if !ids.is_empty() {
        for i in 0..replies {
            add_comment_to_thread(
                &store,
                &NoopRevalidator,
                NewComment {
                    thread_id: ids[i % ids.len()],
                    text: format!("reply {}", i),
                    author,
                    path: "/".to_string(),
                },
            )
            .await
            .unwrap();
        }
    }

    (store, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: a page never exceeds per_page and has_next matches the count
    #[test]
    fn prop_page_bounds(posts in 0usize..60, replies in 0usize..20, page in 1u32..6, per_page in 1u32..25) {
        let rt = runtime();
        let (store, _) = rt.block_on(seeded(posts, replies));
        let pagination = Pagination::new(page, per_page);

        let result = rt.block_on(fetch_posts(&store, pagination)).unwrap();

        prop_assert!(result.items.len() <= per_page as usize);
        prop_assert_eq!(result.total, posts as u64);

        let skip = (page as u64 - 1) * per_page as u64;
        let expected_len = (posts as u64).saturating_sub(skip).min(per_page as u64);
        prop_assert_eq!(result.items.len() as u64, expected_len);
        prop_assert_eq!(result.has_next, result.total > skip + result.items.len() as u64);
    }

    /// Property: walking every page yields each top-level thread exactly once, newest first
    #[test]
    fn prop_pages_partition_feed(posts in 0usize..45, replies in 0usize..10, per_page in 1u32..12) {
        let rt = runtime();
        let (store, mut ids) = rt.block_on(seeded(posts, replies));
        ids.reverse();

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let result = rt.block_on(fetch_posts(&store, Pagination::new(page, per_page))).unwrap();
            prop_assert!(result.items.iter().all(|p| !ids.is_empty() && ids.contains(&p.id)));
            seen.extend(result.items.iter().map(|p| p.id));
            if !result.has_next {
                break;
            }
            page += 1;
        }

        prop_assert_eq!(seen, ids);
    }
}

#[test]
fn twenty_five_posts_split_twenty_and_five() {
    let rt = runtime();
    let (store, _) = rt.block_on(seeded(25, 0));

    let first = rt.block_on(fetch_posts(&store, Pagination::new(1, 20))).unwrap();
    assert_eq!(first.items.len(), 20);
    assert!(first.has_next);

    let second = rt.block_on(fetch_posts(&store, Pagination::new(2, 20))).unwrap();
    assert_eq!(second.items.len(), 5);
    assert!(!second.has_next);
}
