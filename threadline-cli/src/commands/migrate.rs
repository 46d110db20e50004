//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use threadline_server::db::{create_pool, migrations};
use threadline_server::ThreadlineConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create or update the PostgreSQL schema
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = match args.database_url {
        Some(url) => url,
        None => ThreadlineConfig::load()
            .context("Failed to load configuration")?
            .database
            .url
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env or config.toml")?,
    };

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    pool.close().await;
    Ok(())
}
