//! Batch form generation
//!
//! Turns a directory of schema files into a directory of HTML forms. The
//! input list is split into fixed-size shards and the shards are spread over
//! a bounded pool of blocking workers. Each worker owns its own pipeline.

mod errors;
mod pool;
mod shard;
mod summary;

pub use errors::{BatchError, BatchResult};
pub use pool::{
    run_batch, BatchOptions, DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORKERS, DEFAULT_OUTPUT_EXTENSION,
};
pub use shard::{discover_inputs, output_path, plan_shards, BatchPlan, Shard, ShardMessage};
pub use summary::{BatchSummary, FileFailure};
