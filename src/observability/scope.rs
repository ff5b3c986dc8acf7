//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - Logs `{name}_INCOMPLETE` on drop if never closed

use std::cell::Cell;
use std::time::Instant;

use super::logger::Logger;

/// A scope that logs the start and the outcome of one unit of work.
///
/// ```ignore
/// let scope = ObservationScope::with_fields(&logger, "GENERATE", &[("schema", "signup.json")]);
/// // ... do work ...
/// scope.complete(); // GENERATE_COMPLETE, with duration_ms
/// ```
pub struct ObservationScope<'a> {
    logger: &'a Logger,
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Logs `{name}_BEGIN` immediately.
    pub fn new(logger: &'a Logger, name: &'a str) -> Self {
        Self::with_fields(logger, name, &[])
    }

    /// Like `new`; `fields` are repeated on every line the scope logs.
    pub fn with_fields(logger: &'a Logger, name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        let event = format!("{}_BEGIN", name);
        logger.info(&event, fields);

        Self {
            logger,
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Logs `{name}_COMPLETE` at INFO level.
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let event = format!("{}_COMPLETE", self.name);
        let elapsed = self.timer.elapsed_ms();

        let mut all_fields = self.field_refs();
        all_fields.push(("duration_ms", elapsed.as_str()));
        all_fields.extend(extra_fields.iter().copied());

        self.logger.info(&event, &all_fields);
    }

    /// Logs `{name}_FAILED` at WARN level: the input was rejected.
    pub fn reject(self, code: &str, reason: &str) {
        self.completed.set(true);
        let event = format!("{}_FAILED", self.name);
        let mut all_fields = self.field_refs();
        all_fields.push(("code", code));
        all_fields.push(("reason", reason));
        self.logger.warn(&event, &all_fields);
    }

    /// Logs `{name}_FAILED` at ERROR level: the work itself broke.
    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        let event = format!("{}_FAILED", self.name);
        let mut all_fields = self.field_refs();
        all_fields.push(("reason", reason));
        self.logger.error(&event, &all_fields);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            self.logger
                .warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Severity;

    // Fatal-only logger keeps test output quiet.
    fn quiet() -> Logger {
        Logger::new(Severity::Fatal)
    }

    #[test]
    fn test_scope_complete() {
        let logger = quiet();
        let scope = ObservationScope::new(&logger, "TEST");
        assert!(!scope.is_completed());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let logger = quiet();
        let scope = ObservationScope::with_fields(&logger, "TEST", &[("schema", "a.json")]);
        scope.complete_with_fields(&[("layout", "grid")]);
    }

    #[test]
    fn test_scope_reject_and_fail() {
        let logger = quiet();
        ObservationScope::new(&logger, "TEST").reject("SF_LAYOUT_SPEC_INVALID", "bad spec");
        ObservationScope::new(&logger, "TEST").fail("panicked");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let logger = quiet();
        let scope = ObservationScope::new(&logger, "TEST");
        drop(scope);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ms: u64 = timer.elapsed_ms().parse().unwrap();
        assert!(ms >= 10);
    }
}
