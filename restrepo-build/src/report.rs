//! Reporting sinks for the generation pipeline.
//!
//! Nothing in this crate logs through a global. Every component writes to an
//! explicit [`Reporter`], so build scripts get cargo-friendly output and
//! tests can capture everything in memory.

use std::cell::RefCell;
use std::env;

/// Destination for progress lines and recoverable problems.
pub trait Reporter {
    /// Progress and outcome lines.
    fn info(&self, message: &str);

    /// Recoverable problems. The run continues after each one.
    fn warn(&self, message: &str);

    /// Fatal problems, reported once just before the run aborts.
    fn error(&self, message: &str);
}

/// Reporter for build-script runs.
///
/// Warnings go through the `cargo:warning` channel when cargo is listening,
/// so they show up in ordinary build output. Everything else goes to stderr,
/// which cargo surfaces under `-vv` and on failure.
#[derive(Debug, Default)]
pub struct CargoReporter;

impl CargoReporter {
    fn under_cargo(&self) -> bool {
        env::var_os("OUT_DIR").is_some()
    }
}

impl Reporter for CargoReporter {
    fn info(&self, message: &str) {
        eprintln!("restrepo-build: {message}");
    }

    fn warn(&self, message: &str) {
        if self.under_cargo() {
            println!("cargo:warning={message}");
        } else {
            eprintln!("restrepo-build: warning: {message}");
        }
    }

    fn error(&self, message: &str) {
        eprintln!("restrepo-build: error: {message}");
    }
}

/// Reporter that records everything in memory for assertions in tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    infos: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// Couples a [`Reporter`] with the warning tally carried into the run
/// summary.
///
/// Recoverable failures must never be dropped silently: [`Diagnostics::warn`]
/// both forwards the message to the reporter and records it for the summary.
pub struct Diagnostics<'a> {
    reporter: &'a dyn Reporter,
    warnings: Vec<String>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            reporter,
            warnings: Vec::new(),
        }
    }

    pub fn info(&self, message: &str) {
        self.reporter.info(message);
    }

    pub fn warn(&mut self, message: String) {
        self.reporter.warn(&message);
        self.warnings.push(message);
    }

    pub fn error(&self, message: &str) {
        self.reporter.error(message);
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_records_and_forwards_warnings() {
        let reporter = MemoryReporter::new();
        let mut diagnostics = Diagnostics::new(&reporter);

        diagnostics.info("starting");
        diagnostics.warn("skipping something".to_string());
        diagnostics.warn("skipping something else".to_string());

        assert_eq!(diagnostics.warning_count(), 2);
        assert_eq!(
            diagnostics.into_warnings(),
            vec!["skipping something", "skipping something else"]
        );
        assert_eq!(reporter.infos(), vec!["starting"]);
        assert_eq!(reporter.warnings().len(), 2);
        assert!(reporter.errors().is_empty());
    }
}
