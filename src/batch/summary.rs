//! Batch results

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::shard::ShardMessage;
use crate::pipeline::GenerationError;

/// Why one file produced no form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: String,
    /// `specification`, `input` or `unexpected`
    pub kind: String,
    pub code: String,
    pub message: String,
}

impl FileFailure {
    pub const WRITE_FAILED: &'static str = "SF_BATCH_OUTPUT_UNWRITABLE";
    pub const SHARD_CRASHED: &'static str = "SF_BATCH_SHARD_CRASHED";

    pub fn from_error(file: &Path, err: &GenerationError) -> Self {
        Self {
            file: file.display().to_string(),
            kind: err.kind().as_str().to_string(),
            code: err.code().to_string(),
            message: err.message(),
        }
    }

    pub fn unexpected(file: &Path, code: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.display().to_string(),
            kind: "unexpected".to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of a whole batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub shards: usize,
    pub failures: Vec<FileFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    /// True when no file failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Folds shard messages into a summary.
#[derive(Debug)]
pub(crate) struct Tally {
    started_at: DateTime<Utc>,
    total: usize,
    shards: usize,
    succeeded: usize,
    failures: Vec<FileFailure>,
    /// Files each shard has reported on so far
    reported: BTreeMap<usize, Vec<PathBuf>>,
}

impl Tally {
    pub(crate) fn new(total: usize, shards: usize) -> Self {
        Self {
            started_at: Utc::now(),
            total,
            shards,
            succeeded: 0,
            failures: Vec::new(),
            reported: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, message: ShardMessage) {
        match message {
            ShardMessage::FileSucceeded { shard, file, .. } => {
                self.succeeded += 1;
                self.reported.entry(shard).or_default().push(file);
            }
            ShardMessage::FileFailed {
                shard,
                file,
                failure,
            } => {
                self.failures.push(failure);
                self.reported.entry(shard).or_default().push(file);
            }
            ShardMessage::ShardExited { .. } => {}
        }
    }

    /// Counts every file of a crashed shard it never reported on as failed.
    pub(crate) fn shard_crashed(&mut self, shard: usize, files: &[PathBuf], reason: &str) {
        let reported = self.reported.get(&shard).cloned().unwrap_or_default();
        for file in files {
            if !reported.contains(file) {
                self.failures.push(FileFailure::unexpected(
                    file,
                    FileFailure::SHARD_CRASHED,
                    reason,
                ));
            }
        }
    }

    pub(crate) fn finish(mut self) -> BatchSummary {
        self.failures.sort_by(|a, b| a.file.cmp(&b.file));
        BatchSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failures.len(),
            shards: self.shards,
            failures: self.failures,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
