//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod ids;
pub mod pagination;
pub mod records;
pub mod text;
pub mod username;
pub mod validation;
pub mod views;

pub use ids::{CommunityId, ThreadId, UserId};
pub use pagination::{FeedPage, Pagination, PaginationParams};
pub use records::{
    CommunityRecord, CommunityUpdate, NewThread, ThreadRecord, UserRecord, UserUpdate,
};
pub use text::{DisplayName, ThreadText};
pub use username::Username;
pub use validation::ValidationError;
pub use views::{
    AuthorProfile, AuthorSummary, CommunitySummary, FeedPost, ReplyLeaf, ReplyNode, ReplyPreview,
    ThreadDetail,
};
