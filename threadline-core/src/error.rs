//! Structured error types for threadline-core services.
//!
//! Every failure carries a kind tag. Storage failures keep the underlying
//! `StoreError` as their source.

use thiserror::Error;

use crate::models::ValidationError;
use crate::store::StoreError;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Storage,
}

/// Main error type for threadline services
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced record does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Caller input failed validation
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The storage backend failed while performing `action`
    #[error("failed to {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Result type alias for threadline services
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a not-found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Wrap a storage error with the action that was being performed
    pub fn storage(action: &'static str, source: StoreError) -> Self {
        Self::Storage { action, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }
}

/// Attach an action label to storage results.
pub(crate) trait StorageContext<T> {
    fn during(self, action: &'static str) -> Result<T>;
}

impl<T> StorageContext<T> for std::result::Result<T, StoreError> {
    fn during(self, action: &'static str) -> Result<T> {
        self.map_err(|source| Error::storage(action, source))
    }
}
