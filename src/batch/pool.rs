//! Worker pool
//!
//! Shards run on blocking threads inside a `JoinSet`. At most `max_workers`
//! shards are in flight; when one finishes the next pending shard starts.
//! Workers report over an unbounded channel and the pool folds the reports
//! into a `BatchSummary`. A worker that panics fails every file it had not
//! yet reported; the other shards keep going.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

use super::errors::{BatchError, BatchResult};
use super::shard::{discover_inputs, plan_shards, run_shard, BatchPlan, Shard, ShardMessage, WorkerContext};
use super::summary::{BatchSummary, Tally};
use crate::layout::ValidationMode;
use crate::observability::{Event, Logger};
use crate::render::{FormRenderer, RenderConfig};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const DEFAULT_OUTPUT_EXTENSION: &str = "html";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub batch_size: usize,
    pub max_workers: usize,
    pub output_extension: String,
    pub render: RenderConfig,
    pub mode: ValidationMode,
    pub logger: Logger,
}

impl BatchOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            render: RenderConfig::default(),
            mode: ValidationMode::default(),
            logger: Logger::default(),
        }
    }

    fn check(&self) -> BatchResult<()> {
        if self.batch_size == 0 {
            return Err(BatchError::InvalidConfig("batch size must be at least 1".into()));
        }
        if self.max_workers == 0 {
            return Err(BatchError::InvalidConfig("worker count must be at least 1".into()));
        }
        if self.output_extension.is_empty() || self.output_extension.contains(['/', '\\']) {
            return Err(BatchError::InvalidConfig(format!(
                "invalid output extension '{}'",
                self.output_extension
            )));
        }
        Ok(())
    }
}

/// Generates a form for every schema under `options.input_dir`.
///
/// Start-up problems (missing input directory, unusable templates, bad
/// sizes) are errors; per-file problems end up in the summary.
pub async fn run_batch(options: &BatchOptions) -> BatchResult<BatchSummary> {
    options.check()?;
    let files = discover_inputs(&options.input_dir)?;
    // Fail fast on templates instead of once per shard.
    FormRenderer::new(&options.render)?;
    fs::create_dir_all(&options.output_dir)?;

    let plan = BatchPlan::new(plan_shards(files, options.batch_size), options.max_workers);
    let total = plan.total_files().to_string();
    let shard_count = plan.shards.len().to_string();
    let workers = plan.initial_workers().to_string();
    options.logger.event(
        Event::BatchStart,
        &[
            ("files", total.as_str()),
            ("shards", shard_count.as_str()),
            ("workers", workers.as_str()),
        ],
    );

    let summary = execute(plan, options).await;

    let succeeded = summary.succeeded.to_string();
    let failed = summary.failed.to_string();
    options.logger.event(
        Event::BatchComplete,
        &[("failed", failed.as_str()), ("succeeded", succeeded.as_str())],
    );
    Ok(summary)
}

async fn execute(plan: BatchPlan, options: &BatchOptions) -> BatchSummary {
    let ctx = WorkerContext {
        render: options.render.clone(),
        mode: options.mode,
        logger: options.logger,
        output_dir: options.output_dir.clone(),
        extension: options.output_extension.clone(),
    };

    let mut tally = Tally::new(plan.total_files(), plan.shards.len());
    let initial = plan.initial_workers();
    let files_by_shard: HashMap<usize, Vec<PathBuf>> = plan
        .shards
        .iter()
        .map(|s| (s.index, s.files.clone()))
        .collect();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut workers = JoinSet::new();
    let mut pending = plan.shards.into_iter();

    for shard in pending.by_ref().take(initial) {
        spawn_worker(&mut workers, shard, ctx.clone(), tx.clone());
    }

    while let Some(joined) = workers.join_next().await {
        drain(&mut rx, &mut tally);

        match joined {
            Ok((index, Err(reason))) => {
                let index_str = index.to_string();
                options.logger.event(
                    Event::ShardCrashed,
                    &[("reason", reason.as_str()), ("shard", index_str.as_str())],
                );
                if let Some(files) = files_by_shard.get(&index) {
                    tally.shard_crashed(index, files, &reason);
                }
            }
            Ok((_, Ok(()))) => {}
            // The wrapper task only awaits; it fails only on runtime shutdown.
            Err(e) => {
                let reason = e.to_string();
                options.logger.error(Event::ShardCrashed.as_str(), &[("reason", reason.as_str())]);
            }
        }

        if let Some(shard) = pending.next() {
            spawn_worker(&mut workers, shard, ctx.clone(), tx.clone());
        }
    }

    drop(tx);
    while let Some(message) = rx.recv().await {
        tally.record(message);
    }
    tally.finish()
}

fn spawn_worker(
    workers: &mut JoinSet<(usize, Result<(), String>)>,
    shard: Shard,
    ctx: WorkerContext,
    tx: UnboundedSender<ShardMessage>,
) {
    let index = shard.index;
    workers.spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || run_shard(shard, ctx, tx))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    format!("worker panicked: {}", e)
                } else {
                    format!("worker cancelled: {}", e)
                }
            });
        (index, outcome)
    });
}

fn drain(rx: &mut UnboundedReceiver<ShardMessage>, tally: &mut Tally) {
    while let Ok(message) = rx.try_recv() {
        tally.record(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_schema(dir: &Path, name: &str, schema: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string(schema).unwrap()).unwrap();
    }

    fn quiet(options: BatchOptions) -> BatchOptions {
        BatchOptions {
            logger: Logger::new(crate::observability::Severity::Fatal),
            ..options
        }
    }

    #[tokio::test]
    async fn test_batch_success_and_failures() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_schema(
            input.path(),
            "contact.json",
            &json!({"type": "object", "properties": {"email": {"type": "string"}}}),
        );
        write_schema(
            input.path(),
            "broken.json",
            &json!({"type": "object", "properties": {"a": {"type": "string"}}, "x-layout": "carousel"}),
        );
        fs::write(input.path().join("garbage.json"), "{not json").unwrap();

        let mut options = quiet(BatchOptions::new(input.path(), output.path()));
        options.batch_size = 1;
        options.max_workers = 2;

        let summary = run_batch(&options).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.shards, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert!(output.path().join("contact.html").is_file());
        assert!(!output.path().join("broken.html").exists());

        let kinds: Vec<&str> = summary.failures.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["specification", "input"]);
    }

    #[tokio::test]
    async fn test_empty_input_dir() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let summary = run_batch(&quiet(BatchOptions::new(input.path(), output.path())))
            .await
            .unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.shards, 0);
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_startup_errors() {
        let dir = TempDir::new().unwrap();

        let missing = quiet(BatchOptions::new(dir.path().join("nope"), dir.path().join("out")));
        let err = run_batch(&missing).await.unwrap_err();
        assert_eq!(err.code(), "SF_BATCH_INPUT_MISSING");

        let mut zero = quiet(BatchOptions::new(dir.path(), dir.path().join("out")));
        zero.batch_size = 0;
        assert_eq!(run_batch(&zero).await.unwrap_err().code(), "SF_BATCH_INVALID_CONFIG");

        let mut templates = quiet(BatchOptions::new(dir.path(), dir.path().join("out")));
        templates.render.templates_dir = Some(dir.path().join("no-templates"));
        assert_eq!(
            run_batch(&templates).await.unwrap_err().code(),
            "SF_RENDER_TEMPLATES_MISSING"
        );
    }

    #[tokio::test]
    async fn test_custom_extension() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_schema(input.path(), "a.json", &json!({"type": "string"}));

        let mut options = quiet(BatchOptions::new(input.path(), output.path()));
        options.output_extension = "htm".to_string();
        let summary = run_batch(&options).await.unwrap();
        assert!(summary.is_success());
        assert!(output.path().join("a.htm").is_file());
    }
}
