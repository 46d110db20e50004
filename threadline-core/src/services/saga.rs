//! Compensating multi-step writes
//!
//! Storage offers no transaction spanning several records, so mutations
//! record an undo step after each write that succeeds. When a later step
//! fails, the recorded steps run in reverse before the error is returned.

use std::future::Future;

use crate::error::{Error, Result};
use crate::models::{CommunityId, ThreadId, UserId};
use crate::store::{Store, StoreError, StoreResult};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Undo {
    DeleteThread(ThreadId),
    PullUserThread(UserId, ThreadId),
    PullCommunityThread(CommunityId, ThreadId),
}

impl Undo {
    async fn run(self, store: &dyn Store) -> StoreResult<bool> {
        match self {
            Self::DeleteThread(id) => store.delete_thread(id).await,
            Self::PullUserThread(user, thread) => store.pull_user_thread(user, thread).await,
            Self::PullCommunityThread(community, thread) => {
                store.pull_community_thread(community, thread).await
            }
        }
    }
}

pub(crate) struct Saga<'a> {
    store: &'a dyn Store,
    action: &'static str,
    completed: Vec<Undo>,
}

impl<'a> Saga<'a> {
    pub(crate) fn new(store: &'a dyn Store, action: &'static str) -> Self {
        Self {
            store,
            action,
            completed: Vec::new(),
        }
    }

    /// Remember how to revert a write that just succeeded.
    pub(crate) fn completed(&mut self, undo: Undo) {
        self.completed.push(undo);
    }

    /// Await a storage step, rolling back on failure.
    pub(crate) async fn step<T>(
        &mut self,
        write: impl Future<Output = StoreResult<T>>,
    ) -> Result<T> {
        match write.await {
            Ok(value) => Ok(value),
            Err(source) => Err(self.abort(Error::storage(self.action, source)).await),
        }
    }

    /// Roll back every completed step and hand back `err`.
    ///
    /// Compensation failures are logged; the original error always wins.
    pub(crate) async fn abort(&mut self, err: Error) -> Error {
        while let Some(undo) = self.completed.pop() {
            match undo.run(self.store).await {
                Ok(_) => tracing::debug!(action = self.action, ?undo, "compensated"),
                Err(e) => log_compensation_failure(self.action, undo, &e),
            }
        }
        err
    }
}

fn log_compensation_failure(action: &'static str, undo: Undo, err: &StoreError) {
    tracing::error!(
        action,
        ?undo,
        error = %err,
        "compensation failed, graph left partially updated"
    );
}
