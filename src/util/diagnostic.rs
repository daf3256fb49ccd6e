//! Shared diagnostic channel for recoverable probe failures.
//!
//! Fatal conditions travel as [`crate::probe::ProbeError`]; everything
//! recoverable (an auxiliary module that fails to import, a probe with
//! unexpected output) is rendered through a [`Diagnostic`] and the phase
//! continues with the remaining work.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no interpreter is found.
    pub const NO_INTERPRETER: &str =
        "help: install python3 or point the PYTHON environment variable at an interpreter";

    /// Suggestion when the config tool is missing.
    pub const NO_CONFIG_TOOL: &str =
        "help: install the python3 development package (python3-dev / python3-devel)";

    /// Suggestion when an auxiliary module cannot be imported.
    pub const MODULE_IMPORT_FAILED: &str =
        "help: install the module into the probed interpreter, e.g. `python3 -m pip install <module>`";

    /// Suggestion when an installation home looks wrong.
    pub const BAD_HOME: &str =
        "help: PYTHON3_HOME must point at an installation root containing the interpreter";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional context and suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}: {}\n", self.severity, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Emit a diagnostic to the shared channel (stderr + tracing).
pub fn emit(diagnostic: &Diagnostic) {
    match diagnostic.severity {
        Severity::Error => tracing::error!("{}", diagnostic.message),
        Severity::Warning => tracing::warn!("{}", diagnostic.message),
        Severity::Note => tracing::info!("{}", diagnostic.message),
    }
    eprint!("{}", diagnostic.format());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::warning("failed to resolve include dir for `numpy`")
            .with_context("import numpy failed in the probed interpreter")
            .with_suggestion(suggestions::MODULE_IMPORT_FAILED);

        let output = diag.format();
        assert!(output.contains("warning: failed to resolve include dir for `numpy`"));
        assert!(output.contains("import numpy failed"));
        assert!(output.contains("pip install"));
    }
}
