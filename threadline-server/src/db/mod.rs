//! Database layer - connection pool, migrations and the PostgreSQL store
//!
//! # Design Principles
//!
//! - Connection pool with explicit limits, shared by every request
//! - Reference sets (`threads`, `children`) are UUID arrays updated in place
//! - Batched `= ANY($1)` lookups for relation resolution, never one query per reference
//! - Unique violations surface as `StoreError::Conflict`

pub mod migrations;
pub mod pool;
pub mod store;

pub use pool::{create_pool, create_pool_with_options};
pub use store::PgStore;
