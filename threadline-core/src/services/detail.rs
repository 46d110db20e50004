//! Single thread with its reply tree
//!
//! The tree is resolved two levels below the root. Replies at depth 2 keep
//! their own `children` as plain ids.

use crate::error::{Error, Result, StorageContext};
use crate::models::{
    AuthorProfile, CommunitySummary, ReplyLeaf, ReplyNode, ThreadDetail, ThreadId, UserId,
};
use crate::store::Store;

use super::resolve;

const ACTION: &str = "fetch thread";

/// Fetch a thread by id with authors resolved at every level.
///
/// A missing thread is reported as `Error::NotFound`, the same way every
/// other service reports a missing record.
#[tracing::instrument(skip(store))]
pub async fn fetch_thread_by_id(store: &dyn Store, id: ThreadId) -> Result<ThreadDetail> {
    let root = store
        .thread(id)
        .await
        .during(ACTION)?
        .ok_or_else(|| Error::not_found("thread", id))?;

    let replies = store.threads(&root.children).await.during(ACTION)?;
    let nested_ids: Vec<ThreadId> = replies
        .iter()
        .flat_map(|r| r.children.iter().copied())
        .collect();
    let nested = resolve::threads_by_id(store, &nested_ids)
        .await
        .during(ACTION)?;

    let authors = resolve::users_by_id(
        store,
        std::iter::once(root.author)
            .chain(replies.iter().map(|r| r.author))
            .chain(nested.values().map(|n| n.author)),
    )
    .await
    .during(ACTION)?;
    let profile = |user: UserId| authors.get(&user).map(AuthorProfile::from);

    let community = match root.community {
        Some(community_id) => store
            .community(community_id)
            .await
            .during(ACTION)?
            .as_ref()
            .map(CommunitySummary::from),
        None => None,
    };

    let children = replies
        .into_iter()
        .map(|reply| {
            let leaves = reply
                .children
                .iter()
                .filter_map(|id| nested.get(id))
                .map(|leaf| ReplyLeaf::from_record(leaf.clone(), profile(leaf.author)))
                .collect();

            ReplyNode {
                id: reply.id,
                author: profile(reply.author),
                parent_id: reply.parent_id,
                children: leaves,
                created_at: reply.created_at,
                text: reply.text,
            }
        })
        .collect();

    Ok(ThreadDetail {
        id: root.id,
        author: profile(root.author),
        community,
        parent_id: root.parent_id,
        children,
        created_at: root.created_at,
        text: root.text,
    })
}
