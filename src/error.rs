use thiserror::Error;

use crate::storage::StoreError;

/// Failures of the service operations, mapped onto HTTP statuses by the API layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input. 400
    #[error("{0}")]
    Validation(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 409
    #[error("{0}")]
    Conflict(String),

    /// Store unreachable or the write failed. 500
    #[error("persistence failure: {0}")]
    Persistence(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(detail) => ServiceError::Conflict(detail),
            other => ServiceError::Persistence(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
