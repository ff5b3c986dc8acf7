//! Batch start-up errors
//!
//! Anything that goes wrong with an individual schema is a per-file failure
//! in the summary, not an error here. These abort the run before any shard
//! starts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

pub type BatchResult<T> = Result<T, BatchError>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("SF_BATCH_INPUT_MISSING: input directory {} does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("SF_BATCH_INVALID_CONFIG: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Templates(#[from] RenderError),

    #[error("SF_BATCH_IO: {0}")]
    Io(#[from] io::Error),
}

impl BatchError {
    pub fn code(&self) -> &'static str {
        match self {
            BatchError::InputMissing(_) => "SF_BATCH_INPUT_MISSING",
            BatchError::InvalidConfig(_) => "SF_BATCH_INVALID_CONFIG",
            BatchError::Templates(e) => e.code().code(),
            BatchError::Io(_) => "SF_BATCH_IO",
        }
    }
}
