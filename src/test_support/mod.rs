//! Test utilities and mocks for pyprobe unit tests.
//!
//! Probes shell out to an interpreter or config tool; [`MockRunner`]
//! substitutes canned output so probe logic is testable without any
//! Python installation on the machine running the tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use pyprobe::test_support::MockRunner;
//!
//! let runner = MockRunner::new();
//! runner.expect_contains("--includes", "-I/usr/include/python3.11\n");
//! // Pass &runner anywhere a CommandRunner is expected...
//! ```

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::util::process::{Captured, CommandRunner, ProcessBuilder};

/// Pattern for matching probe commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on the full command string.
    Exact(String),
    /// Match if the command contains a substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// One expected probe command and its canned output.
#[derive(Debug, Clone)]
struct Expectation {
    pattern: CommandPattern,
    output: Captured,
}

/// A probe invocation as the mock observed it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The full command string.
    pub command: String,
    /// Environment overrides the probe carried.
    pub envs: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct Inner {
    expectations: Vec<Expectation>,
    calls: Vec<RecordedCall>,
}

/// Mock command runner with canned per-command output.
///
/// Clones share expectations and recorded calls, so a test can hand one
/// clone to the module under test and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    inner: Arc<Mutex<Inner>>,
}

impl MockRunner {
    /// Create a new mock with no expectations.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Expect an exact command, returning successful stdout.
    pub fn expect(&self, cmd: &str, stdout: &str) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), Captured::success(stdout))
    }

    /// Expect any command containing a substring, returning successful
    /// stdout.
    pub fn expect_contains(&self, substring: &str, stdout: &str) -> &Self {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            Captured::success(stdout),
        )
    }

    /// Expect any command containing a substring, returning a failure
    /// with the given status.
    pub fn expect_failure(&self, substring: &str, status: i32) -> &Self {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            Captured::failure(status),
        )
    }

    fn push(&self, pattern: CommandPattern, output: Captured) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .expectations
            .push(Expectation { pattern, output });
        self
    }

    /// All probe invocations observed so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }
}

impl CommandRunner for MockRunner {
    fn capture(&self, cmd: &ProcessBuilder) -> Result<Captured> {
        let command = cmd.display_command();
        let mut inner = self.inner.lock().unwrap();

        inner.calls.push(RecordedCall {
            command: command.clone(),
            envs: cmd.get_envs().to_vec(),
        });

        for exp in &inner.expectations {
            if exp.pattern.matches(&command) {
                return Ok(exp.output.clone());
            }
        }

        bail!("unexpected probe command: {}", command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_matches_and_records() {
        let runner = MockRunner::new();
        runner.expect_contains("--includes", "-I/inc\n");

        let out = runner
            .capture(&ProcessBuilder::new("python3-config").arg("--includes"))
            .unwrap();
        assert_eq!(out.stdout, "-I/inc\n");

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "python3-config --includes");
    }

    #[test]
    fn test_mock_runner_rejects_unexpected() {
        let runner = MockRunner::new();
        assert!(runner.capture(&ProcessBuilder::new("rm")).is_err());
    }
}
