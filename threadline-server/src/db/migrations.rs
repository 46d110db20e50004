//! Database migrations for the thread graph
//!
//! References between records are plain UUID columns and arrays without
//! foreign keys: a dangling reference is tolerated and resolved as missing.

use sqlx::PgPool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            external_id TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            image TEXT,
            bio TEXT,
            onboarded BOOLEAN NOT NULL DEFAULT FALSE,
            threads UUID[] NOT NULL DEFAULT '{}'
        )
        "#,
    ),
    (
        "communities",
        r#"
        CREATE TABLE IF NOT EXISTS communities (
            id UUID PRIMARY KEY,
            external_id TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            image TEXT,
            bio TEXT,
            threads UUID[] NOT NULL DEFAULT '{}'
        )
        "#,
    ),
    (
        "threads",
        r#"
        CREATE TABLE IF NOT EXISTS threads (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            text TEXT NOT NULL,
            author_id UUID NOT NULL,
            community_id UUID,
            parent_id UUID,
            children UUID[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "threads_top_level_idx",
        r#"
        CREATE INDEX IF NOT EXISTS threads_top_level_idx
            ON threads (created_at DESC, seq DESC)
            WHERE parent_id IS NULL
        "#,
    ),
];

/// Run all migrations. Every statement is idempotent.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running threadline migrations...");

    for (name, sql) in STATEMENTS {
        sqlx::query(sql).execute(pool).await?;
        tracing::debug!(migration = name, "applied");
    }

    tracing::info!("Migrations complete");
    Ok(())
}
