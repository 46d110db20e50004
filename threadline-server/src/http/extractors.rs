//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use threadline_core::{ThreadId, ValidationError};

use super::error::ApiError;

/// Extract and validate a thread id from path
pub struct ValidThreadId(pub ThreadId);

impl<S> FromRequestParts<S> for ValidThreadId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::Empty { field: "id" })?;

        let id = id
            .parse::<ThreadId>()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id",
                reason: "invalid UUID format",
            })?;

        Ok(Self(id))
    }
}
