//! Storage adapter contract
//!
//! Every backend stores three record kinds (users, communities, threads) whose
//! reference sets (`threads`, `children`) are appended to and removed from with
//! push/pull operations. Multi-record writes are not atomic at this layer; the
//! services sequence them and compensate on failure.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CommunityId, CommunityRecord, CommunityUpdate, NewThread, ThreadId, ThreadRecord, UserId,
    UserRecord, UserUpdate,
};

pub use memory::MemoryStore;

/// Error raised by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A uniqueness constraint rejected the write
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a driver error, keeping it as the source.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage adapter consumed by the services.
///
/// Batch lookups (`threads`, `users`, `communities`) return found records in
/// the order of the requested ids and silently skip ids with no record.
/// Push/pull operations return `false` when the target record does not exist.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_thread(&self, thread: NewThread) -> StoreResult<ThreadRecord>;

    async fn thread(&self, id: ThreadId) -> StoreResult<Option<ThreadRecord>>;

    async fn threads(&self, ids: &[ThreadId]) -> StoreResult<Vec<ThreadRecord>>;

    /// Remove a thread record. Used to compensate a failed multi-step write.
    async fn delete_thread(&self, id: ThreadId) -> StoreResult<bool>;

    /// Threads without a parent, newest first, ties most-recently-inserted first.
    async fn top_level_threads(&self, skip: u64, limit: u32) -> StoreResult<Vec<ThreadRecord>>;

    async fn count_top_level_threads(&self) -> StoreResult<u64>;

    async fn push_child(&self, parent: ThreadId, child: ThreadId) -> StoreResult<bool>;

    async fn user(&self, id: UserId) -> StoreResult<Option<UserRecord>>;

    async fn users(&self, ids: &[UserId]) -> StoreResult<Vec<UserRecord>>;

    async fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<UserRecord>>;

    /// Insert or update by `external_id`, preserving the authored thread set.
    async fn upsert_user(&self, update: UserUpdate) -> StoreResult<UserRecord>;

    async fn push_user_thread(&self, user: UserId, thread: ThreadId) -> StoreResult<bool>;

    async fn pull_user_thread(&self, user: UserId, thread: ThreadId) -> StoreResult<bool>;

    async fn community(&self, id: CommunityId) -> StoreResult<Option<CommunityRecord>>;

    async fn communities(&self, ids: &[CommunityId]) -> StoreResult<Vec<CommunityRecord>>;

    async fn community_by_external_id(
        &self,
        external_id: &str,
    ) -> StoreResult<Option<CommunityRecord>>;

    async fn upsert_community(&self, update: CommunityUpdate) -> StoreResult<CommunityRecord>;

    async fn push_community_thread(
        &self,
        community: CommunityId,
        thread: ThreadId,
    ) -> StoreResult<bool>;

    async fn pull_community_thread(
        &self,
        community: CommunityId,
        thread: ThreadId,
    ) -> StoreResult<bool>;
}
