//! Revalidation hook
//!
//! Called after a mutation so the presentation layer can drop cached views of
//! the given path. The hook returns nothing: a failed notification is the
//! implementation's problem to log, never the mutation's.

use std::sync::Mutex;

use async_trait::async_trait;

#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate(&self, path: &str);
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRevalidator;

#[async_trait]
impl Revalidator for NoopRevalidator {
    async fn revalidate(&self, path: &str) {
        tracing::trace!(path, "revalidation skipped");
    }
}

/// Hook that remembers every path it was asked to revalidate
#[derive(Debug, Default)]
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths received so far, oldest first.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Revalidator for RecordingRevalidator {
    async fn revalidate(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_order() {
        let hook = RecordingRevalidator::new();
        hook.revalidate("/").await;
        hook.revalidate("/thread/1").await;
        assert_eq!(hook.paths(), vec!["/", "/thread/1"]);
    }
}
