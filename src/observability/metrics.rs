//! Metrics registry
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the playground server and batch runs.
///
/// Relaxed ordering throughout: counters are independent and only read
/// for reporting.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Generation requests received
    requests: AtomicU64,
    /// Requests that produced a form
    forms_generated: AtomicU64,
    /// Requests rejected for an invalid layout specification
    specification_errors: AtomicU64,
    /// Requests rejected for unreadable or malformed input
    input_errors: AtomicU64,
    /// Requests that failed unexpectedly
    unexpected_failures: AtomicU64,
    /// Specifications written to the store
    specs_saved: AtomicU64,
    /// Specifications removed from the store
    specs_deleted: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_forms_generated(&self) {
        self.forms_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_specification_errors(&self) {
        self.specification_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_input_errors(&self) {
        self.input_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unexpected_failures(&self) {
        self.unexpected_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_specs_saved(&self) {
        self.specs_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_specs_deleted(&self) {
        self.specs_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// All counters at this instant
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            forms_generated: self.forms_generated.load(Ordering::Relaxed),
            specification_errors: self.specification_errors.load(Ordering::Relaxed),
            input_errors: self.input_errors.load(Ordering::Relaxed),
            unexpected_failures: self.unexpected_failures.load(Ordering::Relaxed),
            specs_saved: self.specs_saved.load(Ordering::Relaxed),
            specs_deleted: self.specs_deleted.load(Ordering::Relaxed),
        }
    }

    /// Snapshot as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub forms_generated: u64,
    pub specification_errors: u64,
    pub input_errors: u64,
    pub unexpected_failures: u64,
    pub specs_saved: u64,
    pub specs_deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.requests, 0);
        assert_eq!(snapshot.forms_generated, 0);
        assert_eq!(snapshot.specs_saved, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_requests();
        registry.increment_requests();
        registry.increment_forms_generated();
        registry.increment_specification_errors();
        registry.increment_input_errors();
        registry.increment_unexpected_failures();
        registry.increment_specs_saved();
        registry.increment_specs_deleted();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.forms_generated, 1);
        assert_eq!(snapshot.specification_errors, 1);
        assert_eq!(snapshot.input_errors, 1);
        assert_eq!(snapshot.unexpected_failures, 1);
        assert_eq!(snapshot.specs_saved, 1);
        assert_eq!(snapshot.specs_deleted, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_requests();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["requests"], 1);
        assert_eq!(parsed["specs_deleted"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_requests();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().requests, 1000);
    }
}
