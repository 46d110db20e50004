//! Resolved shapes returned by the read services
//!
//! Resolved references are `Option` because a stored reference may point at
//! a record that no longer exists. Missing children are dropped instead.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CommunityId, CommunityRecord, ThreadId, ThreadRecord, UserId, UserRecord};

/// Author fields shown next to reply previews
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: String,
    pub image: Option<String>,
}

impl From<&UserRecord> for AuthorSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// Author fields shown on a full post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorProfile {
    pub id: UserId,
    pub external_id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&UserRecord> for AuthorProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            external_id: user.external_id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunitySummary {
    pub id: CommunityId,
    pub external_id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&CommunityRecord> for CommunitySummary {
    fn from(community: &CommunityRecord) -> Self {
        Self {
            id: community.id,
            external_id: community.external_id.clone(),
            name: community.name.clone(),
            image: community.image.clone(),
        }
    }
}

/// A direct reply as listed under a feed post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyPreview {
    pub id: ThreadId,
    pub parent_id: Option<ThreadId>,
    pub author: Option<AuthorSummary>,
    pub created_at: DateTime<Utc>,
}

/// A top-level post in the feed or in a profile listing
///
/// Author and community are the full stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPost {
    pub id: ThreadId,
    pub text: String,
    pub author: Option<UserRecord>,
    pub community: Option<CommunityRecord>,
    pub children: Vec<ReplyPreview>,
    pub created_at: DateTime<Utc>,
}

/// A thread with its reply tree resolved two levels deep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadDetail {
    pub id: ThreadId,
    pub text: String,
    pub author: Option<AuthorProfile>,
    pub community: Option<CommunitySummary>,
    pub parent_id: Option<ThreadId>,
    pub children: Vec<ReplyNode>,
    pub created_at: DateTime<Utc>,
}

/// Depth-1 reply: its own replies are resolved as leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyNode {
    pub id: ThreadId,
    pub text: String,
    pub author: Option<AuthorProfile>,
    pub parent_id: Option<ThreadId>,
    pub children: Vec<ReplyLeaf>,
    pub created_at: DateTime<Utc>,
}

/// Depth-2 reply: deeper replies stay as unresolved ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyLeaf {
    pub id: ThreadId,
    pub text: String,
    pub author: Option<AuthorProfile>,
    pub parent_id: Option<ThreadId>,
    pub children: Vec<ThreadId>,
    pub created_at: DateTime<Utc>,
}

impl ReplyLeaf {
    pub(crate) fn from_record(record: ThreadRecord, author: Option<AuthorProfile>) -> Self {
        Self {
            id: record.id,
            text: record.text,
            author,
            parent_id: record.parent_id,
            children: record.children,
            created_at: record.created_at,
        }
    }
}
