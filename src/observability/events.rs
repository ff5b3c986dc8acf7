//! Lifecycle events
//!
//! Events are explicit and typed. Per-request BEGIN/COMPLETE/FAILED lines
//! come from `ObservationScope`; the events here mark everything else.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// No configuration file, defaults in use
    ConfigDefaulted,

    // Engine
    /// Schema parsed into a tree
    SchemaLoaded,
    /// Specification inferred from the schema
    SpecInferred,
    /// Caller-supplied specification accepted
    SpecAccepted,
    /// Specification failed validation
    SpecRejected,
    /// Form page rendered
    FormRendered,

    // Batch
    /// Batch run starting
    BatchStart,
    /// Batch run finished
    BatchComplete,
    /// Shard worker started
    ShardStart,
    /// Shard worker finished its files
    ShardComplete,
    /// Shard worker crashed
    ShardCrashed,
    /// One file in a batch failed
    FileFailed,

    // Specification store
    /// Specification written to the store
    SpecSaved,
    /// Specification removed from the store
    SpecDeleted,

    // Server
    /// Playground server ready for requests
    Serving,
    /// Playground server stopped
    ServerStopped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",

            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SpecInferred => "SPEC_INFERRED",
            Event::SpecAccepted => "SPEC_ACCEPTED",
            Event::SpecRejected => "SPEC_REJECTED",
            Event::FormRendered => "FORM_RENDERED",

            Event::BatchStart => "BATCH_BEGIN",
            Event::BatchComplete => "BATCH_COMPLETE",
            Event::ShardStart => "SHARD_BEGIN",
            Event::ShardComplete => "SHARD_COMPLETE",
            Event::ShardCrashed => "SHARD_CRASHED",
            Event::FileFailed => "FILE_FAILED",

            Event::SpecSaved => "SPEC_SAVED",
            Event::SpecDeleted => "SPEC_DELETED",

            Event::Serving => "SCHEMAFORM_SERVING",
            Event::ServerStopped => "SCHEMAFORM_STOPPED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaLoaded | Event::SpecInferred | Event::SpecAccepted => Severity::Trace,
            Event::SpecRejected | Event::FileFailed => Severity::Warn,
            Event::ShardCrashed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::ConfigDefaulted,
            Event::SchemaLoaded,
            Event::SpecInferred,
            Event::SpecAccepted,
            Event::SpecRejected,
            Event::FormRendered,
            Event::BatchStart,
            Event::BatchComplete,
            Event::ShardStart,
            Event::ShardComplete,
            Event::ShardCrashed,
            Event::FileFailed,
            Event::SpecSaved,
            Event::SpecDeleted,
            Event::Serving,
            Event::ServerStopped,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::ShardCrashed.severity(), Severity::Error);
        assert_eq!(Event::SpecRejected.severity(), Severity::Warn);
        assert_eq!(Event::SpecInferred.severity(), Severity::Trace);
        assert_eq!(Event::BatchComplete.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::BatchStart), "BATCH_BEGIN");
    }
}
