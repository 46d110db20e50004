//! Application state shared across handlers

use std::sync::Arc;

use threadline_core::{Revalidator, Store};

/// Shared application state
///
/// Storage and revalidation are injected so the same router runs against
/// PostgreSQL in production and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    revalidator: Arc<dyn Revalidator>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, revalidator }),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    pub fn revalidator(&self) -> &dyn Revalidator {
        self.inner.revalidator.as_ref()
    }
}
