//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use finadv_core::{RecordId, ValidationError};

use super::error::ApiError;

/// Extract and validate a record id from path
pub struct ValidRecordId(pub RecordId);

impl<S> FromRequestParts<S> for ValidRecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        Ok(Self(id.parse()?))
    }
}
