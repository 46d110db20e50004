//! Replies to existing threads

use crate::error::{Error, Result, StorageContext};
use crate::models::{NewThread, ThreadId, ThreadRecord, ThreadText, UserId};
use crate::revalidate::Revalidator;
use crate::store::Store;

use super::saga::{Saga, Undo};

const ACTION: &str = "add comment";

/// Input for [`add_comment_to_thread`]
#[derive(Debug, Clone)]
pub struct NewComment {
    pub thread_id: ThreadId,
    pub text: String,
    pub author: UserId,
    pub path: String,
}

/// Create a reply under `thread_id` and append it to the parent's children.
///
/// The reply is removed again if the parent cannot be updated.
#[tracing::instrument(skip(store, revalidator, comment), fields(parent = %comment.thread_id))]
pub async fn add_comment_to_thread(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    comment: NewComment,
) -> Result<ThreadRecord> {
    let text = ThreadText::new(&comment.text)?;

    let parent = store
        .thread(comment.thread_id)
        .await
        .during(ACTION)?
        .ok_or_else(|| Error::not_found("thread", comment.thread_id))?;

    let mut saga = Saga::new(store, ACTION);

    let reply = saga
        .step(store.insert_thread(NewThread {
            text,
            author: comment.author,
            community: None,
            parent_id: Some(parent.id),
        }))
        .await?;
    saga.completed(Undo::DeleteThread(reply.id));

    // The parent can vanish between the lookup and this write.
    if !saga.step(store.push_child(parent.id, reply.id)).await? {
        return Err(saga.abort(Error::not_found("thread", parent.id)).await);
    }

    revalidator.revalidate(&comment.path).await;
    tracing::info!(reply = %reply.id, "comment added");

    Ok(reply)
}
