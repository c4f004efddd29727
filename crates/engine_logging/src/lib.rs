#![deny(missing_docs)]
//! Shared logging utilities for the renderer workspace.
//!
//! This crate provides [`RunLog`], the handle a single pipeline run logs
//! through, and a minimal test initializer for the global logger backend.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Default log target used when a run does not name its own.
pub const DEFAULT_TARGET: &str = "renderer";

/// Logging handle scoped to one pipeline run.
///
/// Every record goes through the `log` facade under the handle's target, so
/// the backend configured by the binary decides where it ends up. The handle
/// counts the warnings and errors it emitted so the run can report a summary.
#[derive(Debug)]
pub struct RunLog {
    target: String,
    warnings: AtomicU32,
    errors: AtomicU32,
}

impl RunLog {
    /// Creates a handle that logs under `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            warnings: AtomicU32::new(0),
            errors: AtomicU32::new(0),
        }
    }

    /// The log target records are emitted under.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Logs a debug-level message.
    pub fn debug(&self, message: impl fmt::Display) {
        log::debug!(target: self.target.as_str(), "{message}");
    }

    /// Logs an info-level message.
    pub fn info(&self, message: impl fmt::Display) {
        log::info!(target: self.target.as_str(), "{message}");
    }

    /// Logs a warn-level message and counts it.
    pub fn warn(&self, message: impl fmt::Display) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
        log::warn!(target: self.target.as_str(), "{message}");
    }

    /// Logs an error-level message and counts it.
    pub fn error(&self, message: impl fmt::Display) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        log::error!(target: self.target.as_str(), "{message}");
    }

    /// Number of warnings emitted through this handle.
    pub fn warning_count(&self) -> u32 {
        self.warnings.load(Ordering::Relaxed)
    }

    /// Number of errors emitted through this handle.
    pub fn error_count(&self) -> u32 {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::RunLog;

    #[test]
    fn counts_warnings_and_errors_separately() {
        super::initialize_for_tests();
        let log = RunLog::new("test-run");
        log.info("starting");
        log.warn("first");
        log.warn("second");
        log.error("broken");

        assert_eq!(log.target(), "test-run");
        assert_eq!(log.warning_count(), 2);
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn default_handle_uses_shared_target() {
        let log = RunLog::default();
        assert_eq!(log.target(), super::DEFAULT_TARGET);
        assert_eq!(log.warning_count(), 0);
    }
}
