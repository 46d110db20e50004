//! In-memory store
//!
//! Backs tests and single-process deployments. Records live behind one
//! `tokio::sync::RwLock`; each thread carries an insertion sequence number so
//! feed ordering stays stable when timestamps tie.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    CommunityId, CommunityRecord, CommunityUpdate, NewThread, ThreadId, ThreadRecord, UserId,
    UserRecord, UserUpdate,
};

#[derive(Default)]
struct Inner {
    next_seq: u64,
    users: HashMap<UserId, UserRecord>,
    communities: HashMap<CommunityId, CommunityRecord>,
    threads: HashMap<ThreadId, (u64, ThreadRecord)>,
}

impl Inner {
    fn top_level_sorted(&self) -> Vec<&(u64, ThreadRecord)> {
        let mut top: Vec<_> = self
            .threads
            .values()
            .filter(|(_, t)| t.is_top_level())
            .collect();
        top.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        top
    }
}

/// Store that keeps every record in process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    failures: Mutex<HashSet<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to the named operation fail with a backend error.
    ///
    /// Operation names are the `Store` method names, e.g. `"push_user_thread"`.
    pub fn fail_on(&self, operation: &'static str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(operation);
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn check(&self, operation: &'static str) -> StoreResult<()> {
        let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        if failures.contains(operation) {
            return Err(StoreError::backend(format!("injected failure in {}", operation)));
        }
        Ok(())
    }

    pub async fn thread_count(&self) -> usize {
        self.inner.read().await.threads.len()
    }
}

fn push_unique(set: &mut Vec<ThreadId>, id: ThreadId) {
    if !set.contains(&id) {
        set.push(id);
    }
}

fn pull(set: &mut Vec<ThreadId>, id: ThreadId) {
    set.retain(|existing| *existing != id);
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_thread(&self, thread: NewThread) -> StoreResult<ThreadRecord> {
        self.check("insert_thread")?;
        let mut inner = self.inner.write().await;

        let record = ThreadRecord {
            id: ThreadId::new(),
            text: thread.text.into_string(),
            author: thread.author,
            community: thread.community,
            parent_id: thread.parent_id,
            children: Vec::new(),
            created_at: Utc::now(),
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.threads.insert(record.id, (seq, record.clone()));
        Ok(record)
    }

    async fn thread(&self, id: ThreadId) -> StoreResult<Option<ThreadRecord>> {
        self.check("thread")?;
        let inner = self.inner.read().await;
        Ok(inner.threads.get(&id).map(|(_, t)| t.clone()))
    }

    async fn threads(&self, ids: &[ThreadId]) -> StoreResult<Vec<ThreadRecord>> {
        self.check("threads")?;
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.threads.get(id).map(|(_, t)| t.clone()))
            .collect())
    }

    async fn delete_thread(&self, id: ThreadId) -> StoreResult<bool> {
        self.check("delete_thread")?;
        let mut inner = self.inner.write().await;
        Ok(inner.threads.remove(&id).is_some())
    }

    async fn top_level_threads(&self, skip: u64, limit: u32) -> StoreResult<Vec<ThreadRecord>> {
        self.check("top_level_threads")?;
        let inner = self.inner.read().await;
        Ok(inner
            .top_level_sorted()
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn count_top_level_threads(&self) -> StoreResult<u64> {
        self.check("count_top_level_threads")?;
        let inner = self.inner.read().await;
        Ok(inner
            .threads
            .values()
            .filter(|(_, t)| t.is_top_level())
            .count() as u64)
    }

    async fn push_child(&self, parent: ThreadId, child: ThreadId) -> StoreResult<bool> {
        self.check("push_child")?;
        let mut inner = self.inner.write().await;
        Ok(match inner.threads.get_mut(&parent) {
            Some((_, t)) => {
                push_unique(&mut t.children, child);
                true
            }
            None => false,
        })
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        self.check("user")?;
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn users(&self, ids: &[UserId]) -> StoreResult<Vec<UserRecord>> {
        self.check("users")?;
        let inner = self.inner.read().await;
        Ok(ids.iter().filter_map(|id| inner.users.get(id).cloned()).collect())
    }

    async fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<UserRecord>> {
        self.check("user_by_external_id")?;
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn upsert_user(&self, update: UserUpdate) -> StoreResult<UserRecord> {
        self.check("upsert_user")?;
        let mut inner = self.inner.write().await;

        let taken = inner.users.values().any(|u| {
            u.username == update.username.as_str() && u.external_id != update.external_id
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "username '{}' is taken",
                update.username.as_str()
            )));
        }

        let existing = inner
            .users
            .values()
            .find(|u| u.external_id == update.external_id)
            .map(|u| (u.id, u.threads.clone()));
        let (id, threads) = existing.unwrap_or_else(|| (UserId::new(), Vec::new()));

        let record = UserRecord {
            id,
            external_id: update.external_id,
            username: update.username.into_string(),
            name: update.name.into_string(),
            image: update.image,
            bio: update.bio,
            onboarded: true,
            threads,
        };
        inner.users.insert(id, record.clone());
        Ok(record)
    }

    async fn push_user_thread(&self, user: UserId, thread: ThreadId) -> StoreResult<bool> {
        self.check("push_user_thread")?;
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(&user) {
            Some(u) => {
                push_unique(&mut u.threads, thread);
                true
            }
            None => false,
        })
    }

    async fn pull_user_thread(&self, user: UserId, thread: ThreadId) -> StoreResult<bool> {
        self.check("pull_user_thread")?;
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(&user) {
            Some(u) => {
                pull(&mut u.threads, thread);
                true
            }
            None => false,
        })
    }

    async fn community(&self, id: CommunityId) -> StoreResult<Option<CommunityRecord>> {
        self.check("community")?;
        Ok(self.inner.read().await.communities.get(&id).cloned())
    }

    async fn communities(&self, ids: &[CommunityId]) -> StoreResult<Vec<CommunityRecord>> {
        self.check("communities")?;
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.communities.get(id).cloned())
            .collect())
    }

    async fn community_by_external_id(
        &self,
        external_id: &str,
    ) -> StoreResult<Option<CommunityRecord>> {
        self.check("community_by_external_id")?;
        let inner = self.inner.read().await;
        Ok(inner
            .communities
            .values()
            .find(|c| c.external_id == external_id)
            .cloned())
    }

    async fn upsert_community(&self, update: CommunityUpdate) -> StoreResult<CommunityRecord> {
        self.check("upsert_community")?;
        let mut inner = self.inner.write().await;

        let taken = inner.communities.values().any(|c| {
            c.username == update.username.as_str() && c.external_id != update.external_id
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "community username '{}' is taken",
                update.username.as_str()
            )));
        }

        let existing = inner
            .communities
            .values()
            .find(|c| c.external_id == update.external_id)
            .map(|c| (c.id, c.threads.clone()));
        let (id, threads) = existing.unwrap_or_else(|| (CommunityId::new(), Vec::new()));

        let record = CommunityRecord {
            id,
            external_id: update.external_id,
            username: update.username.into_string(),
            name: update.name.into_string(),
            image: update.image,
            bio: update.bio,
            threads,
        };
        inner.communities.insert(id, record.clone());
        Ok(record)
    }

    async fn push_community_thread(
        &self,
        community: CommunityId,
        thread: ThreadId,
    ) -> StoreResult<bool> {
        self.check("push_community_thread")?;
        let mut inner = self.inner.write().await;
        Ok(match inner.communities.get_mut(&community) {
            Some(c) => {
                push_unique(&mut c.threads, thread);
                true
            }
            None => false,
        })
    }

    async fn pull_community_thread(
        &self,
        community: CommunityId,
        thread: ThreadId,
    ) -> StoreResult<bool> {
        self.check("pull_community_thread")?;
        let mut inner = self.inner.write().await;
        Ok(match inner.communities.get_mut(&community) {
            Some(c) => {
                pull(&mut c.threads, thread);
                true
            }
            None => false,
        })
    }
}
