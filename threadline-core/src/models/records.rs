//! Stored records and write payloads
//!
//! Records hold references (ids) to each other; resolving them into nested
//! shapes is the job of the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommunityId, DisplayName, ThreadId, ThreadText, UserId, Username};

/// User record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// Identity-provider id, unique
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub onboarded: bool,
    /// Threads authored by this user
    pub threads: Vec<ThreadId>,
}

/// Community record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityRecord {
    pub id: CommunityId,
    /// External-facing id, distinct from `id`
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    /// Threads posted under this community
    pub threads: Vec<ThreadId>,
}

/// Thread record as stored. Replies are threads with a `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub id: ThreadId,
    pub text: String,
    pub author: UserId,
    pub community: Option<CommunityId>,
    pub parent_id: Option<ThreadId>,
    /// Direct replies, in insertion order
    pub children: Vec<ThreadId>,
    pub created_at: DateTime<Utc>,
}

impl ThreadRecord {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Payload for inserting a thread; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewThread {
    pub text: ThreadText,
    pub author: UserId,
    pub community: Option<CommunityId>,
    pub parent_id: Option<ThreadId>,
}

/// Insert-or-update payload for a user, keyed by `external_id`
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub external_id: String,
    pub username: Username,
    pub name: DisplayName,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// Insert-or-update payload for a community, keyed by `external_id`
#[derive(Debug, Clone)]
pub struct CommunityUpdate {
    pub external_id: String,
    pub username: Username,
    pub name: DisplayName,
    pub image: Option<String>,
    pub bio: Option<String>,
}
