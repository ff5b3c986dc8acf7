//! Specification store errors

use std::io;

use thiserror::Error;

use crate::layout::SpecDocumentError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SF_STORE_INVALID_ID: invalid specification id '{0}'")]
    InvalidId(String),

    #[error("SF_STORE_NOT_FOUND: no specification with id '{0}'")]
    NotFound(String),

    #[error("SF_STORE_IO: {0}")]
    Io(#[from] io::Error),

    #[error("SF_STORE_MALFORMED: stored specification '{id}' is unreadable: {source}")]
    Malformed {
        id: String,
        #[source]
        source: SpecDocumentError,
    },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidId(_) => "SF_STORE_INVALID_ID",
            StoreError::NotFound(_) => "SF_STORE_NOT_FOUND",
            StoreError::Io(_) => "SF_STORE_IO",
            StoreError::Malformed { .. } => "SF_STORE_MALFORMED",
        }
    }

    /// HTTP status for the playground routes
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::InvalidId(_) => 400,
            StoreError::NotFound(_) => 404,
            StoreError::Io(_) => 500,
            StoreError::Malformed { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::NotFound("signup".into()).status_code(), 404);
        assert_eq!(StoreError::InvalidId("../x".into()).status_code(), 400);
        assert_eq!(StoreError::NotFound("signup".into()).code(), "SF_STORE_NOT_FOUND");
    }
}
