//! Reference resolution shared by the read services
//!
//! Each level of the graph is loaded with one batched lookup per record kind,
//! never one lookup per reference.

use std::collections::HashMap;

use crate::models::{
    AuthorSummary, CommunityId, CommunityRecord, FeedPost, ReplyPreview, ThreadId, ThreadRecord,
    UserId, UserRecord,
};
use crate::store::{Store, StoreResult};

pub(crate) async fn users_by_id(
    store: &dyn Store,
    ids: impl IntoIterator<Item = UserId>,
) -> StoreResult<HashMap<UserId, UserRecord>> {
    let mut ids: Vec<UserId> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = store.users(&ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub(crate) async fn communities_by_id(
    store: &dyn Store,
    ids: impl IntoIterator<Item = CommunityId>,
) -> StoreResult<HashMap<CommunityId, CommunityRecord>> {
    let mut ids: Vec<CommunityId> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let communities = store.communities(&ids).await?;
    Ok(communities.into_iter().map(|c| (c.id, c)).collect())
}

pub(crate) async fn threads_by_id(
    store: &dyn Store,
    ids: &[ThreadId],
) -> StoreResult<HashMap<ThreadId, ThreadRecord>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let threads = store.threads(ids).await?;
    Ok(threads.into_iter().map(|t| (t.id, t)).collect())
}

/// Resolve top-level records into feed posts.
///
/// Authors and communities resolve to their full records and direct
/// replies become previews carrying their own author summary. Replies whose
/// record is gone are dropped.
pub(crate) async fn feed_posts(
    store: &dyn Store,
    records: Vec<ThreadRecord>,
) -> StoreResult<Vec<FeedPost>> {
    let child_ids: Vec<ThreadId> = records
        .iter()
        .flat_map(|t| t.children.iter().copied())
        .collect();
    let children = threads_by_id(store, &child_ids).await?;

    let authors = users_by_id(
        store,
        records
            .iter()
            .map(|t| t.author)
            .chain(children.values().map(|c| c.author)),
    )
    .await?;
    let communities = communities_by_id(store, records.iter().filter_map(|t| t.community)).await?;

    let posts = records
        .into_iter()
        .map(|record| {
            let previews = record
                .children
                .iter()
                .filter_map(|id| children.get(id))
                .map(|child| ReplyPreview {
                    id: child.id,
                    parent_id: child.parent_id,
                    author: authors.get(&child.author).map(AuthorSummary::from),
                    created_at: child.created_at,
                })
                .collect();

            FeedPost {
                id: record.id,
                author: authors.get(&record.author).cloned(),
                community: record
                    .community
                    .and_then(|id| communities.get(&id))
                    .cloned(),
                children: previews,
                created_at: record.created_at,
                text: record.text,
            }
        })
        .collect();

    Ok(posts)
}
