//! HTTP server command
//!
//! Resolves settings from flags, environment and `~/.threadline/config.toml`
//! (in that order of precedence), then runs the API until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use threadline_core::{MemoryStore, NoopRevalidator, Revalidator, Store};
use threadline_server::db::{create_pool_with_options, migrations, PgStore};
use threadline_server::revalidate::WebhookRevalidator;
use threadline_server::{run_server, AppState, ServerConfig, ThreadlineConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Endpoint that receives `POST {"path": ...}` after each mutation
    #[arg(long, env = "THREADLINE_REVALIDATE_URL")]
    pub revalidate_url: Option<String>,

    /// Keep all data in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut ThreadlineConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(url) = &self.revalidate_url {
            config.revalidate.url = Some(url.clone()).filter(|u| !u.is_empty());
        }
    }
}

fn revalidator(config: &ThreadlineConfig) -> Result<Arc<dyn Revalidator>> {
    match &config.revalidate.url {
        Some(url) => {
            let hook = WebhookRevalidator::new(
                url.as_str(),
                Duration::from_secs(config.revalidate.timeout_secs),
            )
            .context("Failed to build revalidation client")?;
            tracing::info!(url = %hook.url(), "Revalidation webhook enabled");
            Ok(Arc::new(hook))
        }
        None => {
            tracing::info!("No revalidation URL configured, revalidation disabled");
            Ok(Arc::new(NoopRevalidator))
        }
    }
}

async fn store(config: &ThreadlineConfig, memory: bool) -> Result<Arc<dyn Store>> {
    if memory {
        if config.database.url.is_some() {
            tracing::warn!("--memory given, ignoring the configured database URL");
        }
        tracing::warn!("Using in-memory store - data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let database_url = config.database.url.as_deref().context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, ~/.threadline/.env or config.toml (or pass --memory)",
    )?;

    let pool = create_pool_with_options(database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(Arc::new(PgStore::new(pool)))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = ThreadlineConfig::load().context("Failed to load configuration")?;
    args.apply(&mut config);

    tracing::info!("Starting threadline server on {}", config.server.bind);

    let state = AppState::new(store(&config, args.memory).await?, revalidator(&config)?);

    run_server(state, ServerConfig::from(&config))
        .await
        .context("Server error")?;

    Ok(())
}
