//! Feed of top-level threads

use crate::error::{Result, StorageContext};
use crate::models::{FeedPage, FeedPost, Pagination};
use crate::store::Store;

use super::resolve;

const ACTION: &str = "fetch posts";

/// Fetch one page of top-level threads, newest first.
///
/// `has_next` compares the unpaginated top-level count against
/// `skip + posts.len()`.
#[tracing::instrument(skip(store))]
pub async fn fetch_posts(store: &dyn Store, page: Pagination) -> Result<FeedPage<FeedPost>> {
    let records = store
        .top_level_threads(page.skip(), page.limit())
        .await
        .during(ACTION)?;
    let total = store.count_top_level_threads().await.during(ACTION)?;

    let posts = resolve::feed_posts(store, records).await.during(ACTION)?;
    tracing::debug!(returned = posts.len(), total, "feed page resolved");

    Ok(FeedPage::new(posts, total, page))
}
