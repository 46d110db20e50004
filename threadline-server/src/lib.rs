//! threadline-server: HTTP surface and PostgreSQL storage for threadline
//!
//! Wires the threadline-core services to:
//! - a sqlx-backed `Store` with schema migrations
//! - an optional webhook that forwards revalidation requests
//! - an axum router exposing feed, thread, comment and profile endpoints

pub mod config;
pub mod db;
pub mod http;
pub mod revalidate;
pub mod state;

pub use config::ThreadlineConfig;
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
