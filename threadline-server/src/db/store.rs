//! PostgreSQL implementation of the threadline `Store`

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use threadline_core::models::{CommunityUpdate, UserUpdate};
use threadline_core::{
    CommunityId, CommunityRecord, NewThread, Store, StoreError, StoreResult, ThreadId,
    ThreadRecord, UserId, UserRecord,
};

const THREAD_COLUMNS: &str = "id, text, author_id, community_id, parent_id, children, created_at";
const USER_COLUMNS: &str = "id, external_id, username, name, image, bio, onboarded, threads";
const COMMUNITY_COLUMNS: &str = "id, external_id, username, name, image, bio, threads";

/// Map a driver error, turning unique violations into conflicts.
fn db_error(e: sqlx::Error) -> StoreError {
    let is_conflict = e
        .as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false);
    if is_conflict {
        return StoreError::Conflict(e.to_string());
    }
    StoreError::with_source(e.to_string(), e)
}

fn uuids<T: Copy + Into<Uuid>>(ids: &[T]) -> Vec<Uuid> {
    ids.iter().map(|&id| id.into()).collect()
}

/// Put rows back in the order of the requested ids, dropping missing ones.
fn in_request_order<K, T>(requested: &[K], rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T>
where
    K: std::hash::Hash + Eq + Copy,
{
    let mut by_id: HashMap<K, T> = rows.into_iter().map(|r| (key(&r), r)).collect();
    requested.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[derive(Debug, FromRow)]
struct ThreadRow {
    id: Uuid,
    text: String,
    author_id: Uuid,
    community_id: Option<Uuid>,
    parent_id: Option<Uuid>,
    children: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<ThreadRow> for ThreadRecord {
    fn from(row: ThreadRow) -> Self {
        Self {
            id: row.id.into(),
            text: row.text,
            author: row.author_id.into(),
            community: row.community_id.map(Into::into),
            parent_id: row.parent_id.map(Into::into),
            children: row.children.into_iter().map(Into::into).collect(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    external_id: String,
    username: String,
    name: String,
    image: Option<String>,
    bio: Option<String>,
    onboarded: bool,
    threads: Vec<Uuid>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            external_id: row.external_id,
            username: row.username,
            name: row.name,
            image: row.image,
            bio: row.bio,
            onboarded: row.onboarded,
            threads: row.threads.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct CommunityRow {
    id: Uuid,
    external_id: String,
    username: String,
    name: String,
    image: Option<String>,
    bio: Option<String>,
    threads: Vec<Uuid>,
}

impl From<CommunityRow> for CommunityRecord {
    fn from(row: CommunityRow) -> Self {
        Self {
            id: row.id.into(),
            external_id: row.external_id,
            username: row.username,
            name: row.name,
            image: row.image,
            bio: row.bio,
            threads: row.threads.into_iter().map(Into::into).collect(),
        }
    }
}

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Append `item` to a UUID array column unless already present.
    ///
    /// Returns false when no row has `id`.
    async fn push(&self, table: &str, column: &str, id: Uuid, item: Uuid) -> StoreResult<bool> {
        let sql = format!(
            "UPDATE {table} SET {column} = CASE WHEN $2 = ANY({column}) THEN {column} \
             ELSE array_append({column}, $2) END WHERE id = $1"
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(item)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn pull(&self, table: &str, column: &str, id: Uuid, item: Uuid) -> StoreResult<bool> {
        let sql = format!("UPDATE {table} SET {column} = array_remove({column}, $2) WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(item)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_thread(&self, thread: NewThread) -> StoreResult<ThreadRecord> {
        let row: ThreadRow = sqlx::query_as(&format!(
            "INSERT INTO threads (id, text, author_id, community_id, parent_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {THREAD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(thread.text.as_str())
        .bind(thread.author.as_uuid())
        .bind(thread.community.map(|c| c.as_uuid()))
        .bind(thread.parent_id.map(|p| p.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn thread(&self, id: ThreadId) -> StoreResult<Option<ThreadRecord>> {
        let row: Option<ThreadRow> =
            sqlx::query_as(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn threads(&self, ids: &[ThreadId]) -> StoreResult<Vec<ThreadRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ThreadRow> =
            sqlx::query_as(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = ANY($1)"))
                .bind(uuids(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        let records = rows.into_iter().map(ThreadRecord::from).collect();
        Ok(in_request_order(ids, records, |t: &ThreadRecord| t.id))
    }

    async fn delete_thread(&self, id: ThreadId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn top_level_threads(&self, skip: u64, limit: u32) -> StoreResult<Vec<ThreadRecord>> {
        let rows: Vec<ThreadRow> = sqlx::query_as(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads \
             WHERE parent_id IS NULL \
             ORDER BY created_at DESC, seq DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(i64::try_from(skip).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_top_level_threads(&self) -> StoreResult<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM threads WHERE parent_id IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(count.max(0) as u64)
    }

    async fn push_child(&self, parent: ThreadId, child: ThreadId) -> StoreResult<bool> {
        self.push("threads", "children", parent.as_uuid(), child.as_uuid())
            .await
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn users(&self, ids: &[UserId]) -> StoreResult<Vec<UserRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
                .bind(uuids(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        let records = rows.into_iter().map(UserRecord::from).collect();
        Ok(in_request_order(ids, records, |u: &UserRecord| u.id))
    }

    async fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn upsert_user(&self, update: UserUpdate) -> StoreResult<UserRecord> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (id, external_id, username, name, image, bio, onboarded) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE) \
             ON CONFLICT (external_id) DO UPDATE SET \
                 username = EXCLUDED.username, \
                 name = EXCLUDED.name, \
                 image = EXCLUDED.image, \
                 bio = EXCLUDED.bio, \
                 onboarded = TRUE \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&update.external_id)
        .bind(update.username.as_str())
        .bind(update.name.as_str())
        .bind(update.image.as_deref())
        .bind(update.bio.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn push_user_thread(&self, user: UserId, thread: ThreadId) -> StoreResult<bool> {
        self.push("users", "threads", user.as_uuid(), thread.as_uuid())
            .await
    }

    async fn pull_user_thread(&self, user: UserId, thread: ThreadId) -> StoreResult<bool> {
        self.pull("users", "threads", user.as_uuid(), thread.as_uuid())
            .await
    }

    async fn community(&self, id: CommunityId) -> StoreResult<Option<CommunityRecord>> {
        let row: Option<CommunityRow> = sqlx::query_as(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM communities WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn communities(&self, ids: &[CommunityId]) -> StoreResult<Vec<CommunityRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<CommunityRow> = sqlx::query_as(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM communities WHERE id = ANY($1)"
        ))
        .bind(uuids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let records = rows.into_iter().map(CommunityRecord::from).collect();
        Ok(in_request_order(ids, records, |c: &CommunityRecord| c.id))
    }

    async fn community_by_external_id(
        &self,
        external_id: &str,
    ) -> StoreResult<Option<CommunityRecord>> {
        let row: Option<CommunityRow> = sqlx::query_as(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM communities WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Into::into))
    }

    async fn upsert_community(&self, update: CommunityUpdate) -> StoreResult<CommunityRecord> {
        let row: CommunityRow = sqlx::query_as(&format!(
            "INSERT INTO communities (id, external_id, username, name, image, bio) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (external_id) DO UPDATE SET \
                 username = EXCLUDED.username, \
                 name = EXCLUDED.name, \
                 image = EXCLUDED.image, \
                 bio = EXCLUDED.bio \
             RETURNING {COMMUNITY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&update.external_id)
        .bind(update.username.as_str())
        .bind(update.name.as_str())
        .bind(update.image.as_deref())
        .bind(update.bio.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn push_community_thread(
        &self,
        community: CommunityId,
        thread: ThreadId,
    ) -> StoreResult<bool> {
        self.push("communities", "threads", community.as_uuid(), thread.as_uuid())
            .await
    }

    async fn pull_community_thread(
        &self,
        community: CommunityId,
        thread: ThreadId,
    ) -> StoreResult<bool> {
        self.pull("communities", "threads", community.as_uuid(), thread.as_uuid())
            .await
    }
}
