//! threadline-core: thread, reply and community graph
//!
//! Provides:
//! - Validated domain models (thread text, usernames, pagination)
//! - The `Store` trait every storage backend implements, plus an in-memory store
//! - The `Revalidator` hook invoked after mutations
//! - Services: feed, thread detail, authoring, comments, profiles

pub mod error;
pub mod models;
pub mod revalidate;
pub mod services;
pub mod store;

pub use error::{Error, ErrorKind, Result};
pub use models::{
    AuthorProfile, AuthorSummary, CommunityId, CommunityRecord, CommunitySummary, FeedPage,
    FeedPost, NewThread, Pagination, PaginationParams, ReplyLeaf, ReplyNode, ReplyPreview,
    ThreadDetail, ThreadId, ThreadRecord, ThreadText, UserId, UserRecord, ValidationError,
};
pub use revalidate::{NoopRevalidator, RecordingRevalidator, Revalidator};
pub use store::{MemoryStore, Store, StoreError, StoreResult};
