//! Input discovery, shard planning and the per-shard worker

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc::UnboundedSender;

use super::errors::{BatchError, BatchResult};
use super::summary::FileFailure;
use crate::layout::ValidationMode;
use crate::observability::{Event, Logger};
use crate::pipeline::{GenerationError, GenerationPipeline, GenerationRequest, InputError};
use crate::render::RenderConfig;

/// A consecutive run of input files handled by one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    pub index: usize,
    pub files: Vec<PathBuf>,
}

/// Shards plus the worker limit they will run under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub shards: Vec<Shard>,
    pub max_workers: usize,
}

impl BatchPlan {
    pub fn new(shards: Vec<Shard>, max_workers: usize) -> Self {
        Self {
            shards,
            max_workers,
        }
    }

    /// Workers started up front: one per shard, at most `max_workers`.
    pub fn initial_workers(&self) -> usize {
        self.max_workers.min(self.shards.len())
    }

    pub fn total_files(&self) -> usize {
        self.shards.iter().map(|s| s.files.len()).sum()
    }
}

/// Progress reports from shard workers
#[derive(Debug, Clone, PartialEq)]
pub enum ShardMessage {
    FileSucceeded {
        shard: usize,
        file: PathBuf,
        output: PathBuf,
    },
    FileFailed {
        shard: usize,
        file: PathBuf,
        failure: FileFailure,
    },
    ShardExited {
        shard: usize,
    },
}

/// Every `*.json` file directly under `dir`, sorted by file name.
pub fn discover_inputs(dir: &Path) -> BatchResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BatchError::InputMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Splits `files` into consecutive shards of `batch_size`; the last may be smaller.
pub fn plan_shards(files: Vec<PathBuf>, batch_size: usize) -> Vec<Shard> {
    let size = batch_size.max(1);
    files
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| Shard {
            index,
            files: chunk.to_vec(),
        })
        .collect()
}

/// `<output_dir>/<stem>.<extension>`
pub fn output_path(output_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "form".to_string());
    output_dir.join(format!("{}.{}", stem, extension))
}

/// What a worker needs besides its shard. Cloned into every worker.
#[derive(Debug, Clone)]
pub(crate) struct WorkerContext {
    pub render: RenderConfig,
    pub mode: ValidationMode,
    pub logger: Logger,
    pub output_dir: PathBuf,
    pub extension: String,
}

/// Processes one shard on the current thread. Shares nothing with other
/// shards: the pipeline is built here and only messages leave.
pub(crate) fn run_shard(shard: Shard, ctx: WorkerContext, tx: UnboundedSender<ShardMessage>) {
    let index = shard.index;
    let index_str = index.to_string();
    let count = shard.files.len().to_string();
    ctx.logger.event(
        Event::ShardStart,
        &[("files", count.as_str()), ("shard", index_str.as_str())],
    );

    let pipeline = match GenerationPipeline::from_config(&ctx.render, ctx.mode, ctx.logger) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            let err = GenerationError::Input(InputError::Render(err));
            for file in shard.files {
                let failure = FileFailure::from_error(&file, &err);
                let _ = tx.send(ShardMessage::FileFailed {
                    shard: index,
                    file,
                    failure,
                });
            }
            let _ = tx.send(ShardMessage::ShardExited { shard: index });
            return;
        }
    };

    for file in shard.files {
        let message = match pipeline.run_guarded(&GenerationRequest::from_file(&file)) {
            Ok(output) => {
                let target = output_path(&ctx.output_dir, &file, &ctx.extension);
                match fs::write(&target, output.html) {
                    Ok(()) => ShardMessage::FileSucceeded {
                        shard: index,
                        file,
                        output: target,
                    },
                    Err(e) => {
                        let failure = FileFailure::unexpected(
                            &file,
                            FileFailure::WRITE_FAILED,
                            format!("cannot write {}: {}", target.display(), e),
                        );
                        ShardMessage::FileFailed {
                            shard: index,
                            file,
                            failure,
                        }
                    }
                }
            }
            Err(err) => ShardMessage::FileFailed {
                shard: index,
                failure: FileFailure::from_error(&file, &err),
                file,
            },
        };

        if let ShardMessage::FileFailed { failure, .. } = &message {
            ctx.logger.event(
                Event::FileFailed,
                &[("code", failure.code.as_str()), ("file", failure.file.as_str())],
            );
        }
        let _ = tx.send(message);
    }

    ctx.logger
        .event(Event::ShardComplete, &[("shard", index_str.as_str())]);
    let _ = tx.send(ShardMessage::ShardExited { shard: index });
}
