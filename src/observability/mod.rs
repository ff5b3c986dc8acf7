//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Atomic counters
//! - Lifecycle event tracing
//!
//! # Principles
//!
//! 1. Observability is read-only: no effect on what gets generated
//! 2. No background threads
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use schemaform::observability::{Event, Logger, MetricsRegistry, ObservationScope};
//!
//! let logger = Logger::for_debug(config.debug);
//! logger.event(Event::BatchStart, &[("files", "23")]);
//!
//! let scope = ObservationScope::new(&logger, "GENERATE");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};
