//! Environment health checks.
//!
//! The `doctor` command performs fast checks to verify that a usable
//! Python toolchain can be probed on this machine.
//!
//! ## Checks Performed
//!
//! - Interpreter availability (python3/python, `PYTHON` override)
//! - Config tool availability (python3-config/python-config)
//! - Interpreter version report
//! - Sysconfig introspection (include/library directories exist)

use std::path::PathBuf;

use anyhow::Result;

use crate::probe::config_tool::ConfigToolProbe;
use crate::probe::interpreter::Interpreter;
use crate::probe::platform::Platform;
use crate::probe::sysconfig::SysconfigReport;
use crate::util::env::{Env, SystemEnv};
use crate::util::process::SystemRunner;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool or directory (if applicable)
    pub path: Option<PathBuf>,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Relevant environment variables and their values
    pub environment: Vec<(String, String)>,
}

impl DoctorReport {
    /// Whether every required check passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed || !c.required)
    }
}

/// Options for the doctor run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoctorOptions {
    /// Include optional checks and environment details.
    pub verbose: bool,
}

/// Run all health checks against the real environment.
pub fn doctor(options: DoctorOptions) -> Result<DoctorReport> {
    let platform = Platform::host();
    let env = SystemEnv;
    let runner = SystemRunner;
    let mut report = DoctorReport::default();

    for name in ["PYTHON", "PYTHON3_HOME", crate::module::EMBED_ENV] {
        if let Some(value) = env.get(name) {
            report.environment.push((name.to_string(), value));
        }
    }

    // Interpreter resolution, location, and version.
    let interpreter = match Interpreter::resolve(platform, &env) {
        Ok(interpreter) => {
            let mut check = match interpreter.location() {
                Some(location) => {
                    CheckResult::pass("interpreter", format!("`{}`", interpreter.program()))
                        .with_path(location)
                }
                None => CheckResult::fail(
                    "interpreter",
                    format!("`{}` not found on PATH", interpreter.program()),
                ),
            };

            if check.passed {
                match interpreter.probe_version(&runner, None) {
                    Ok(version) => check.message = format!("`{}` {}", interpreter.program(), version),
                    Err(err) => {
                        check = CheckResult::fail(
                            "interpreter",
                            format!("version probe failed: {}", err),
                        );
                    }
                }
            }

            let usable = check.passed;
            report.checks.push(check);
            usable.then_some(interpreter)
        }
        Err(err) => {
            report
                .checks
                .push(CheckResult::fail("interpreter", err.to_string()));
            None
        }
    };

    // Config tool resolution.
    let config_tool = ConfigToolProbe::resolve(platform);
    let check = match (config_tool.tool(), config_tool.expected()) {
        (Some(tool), _) => {
            let mut check = CheckResult::pass("config tool", format!("`{}`", tool));
            if let Some(path) = crate::util::process::find_executable(tool) {
                check = check.with_path(path);
            }
            check
        }
        (None, true) => CheckResult::fail(
            "config tool",
            "python3-config / python-config not found on PATH",
        ),
        (None, false) => {
            CheckResult::pass("config tool", "not expected on this platform").optional()
        }
    };
    report.checks.push(check);

    // Sysconfig introspection: do the reported directories exist?
    if let Some(ref interpreter) = interpreter {
        match SysconfigReport::query(interpreter, &runner, None) {
            Ok(sysconfig) => {
                report.checks.push(dir_check("include dir", sysconfig.include));
                report
                    .checks
                    .push(dir_check("library dir", sysconfig.libdir).optional());
                if options.verbose {
                    if let Some(prefix) = sysconfig.prefix {
                        report
                            .environment
                            .push(("prefix".to_string(), prefix));
                    }
                    if let Some(ldlibrary) = sysconfig.ldlibrary {
                        report
                            .environment
                            .push(("runtime library".to_string(), ldlibrary));
                    }
                }
            }
            Err(err) => {
                report.checks.push(
                    CheckResult::fail("introspection", err.to_string()).optional(),
                );
            }
        }
    }

    Ok(report)
}

fn dir_check(name: &str, reported: Option<String>) -> CheckResult {
    match reported {
        Some(dir) => {
            let path = PathBuf::from(&dir);
            if path.is_dir() {
                CheckResult::pass(name, dir).with_path(path)
            } else {
                CheckResult::fail(name, format!("reported but missing: {}", dir))
            }
        }
        None => CheckResult::fail(name, "not reported by the interpreter"),
    }
}

/// Format a report for terminal output.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut out = String::new();

    for check in &report.checks {
        let mark = if check.passed { "ok" } else { "FAIL" };
        out.push_str(&format!("{:<14} [{}] {}\n", check.name, mark, check.message));
        if verbose {
            if let Some(ref path) = check.path {
                out.push_str(&format!("{:<14}       {}\n", "", path.display()));
            }
        }
    }

    if verbose && !report.environment.is_empty() {
        out.push('\n');
        for (name, value) in &report.environment {
            out.push_str(&format!("{} = {}\n", name, value));
        }
    }

    if report.all_required_passed() {
        out.push_str("\nall required checks passed\n");
    } else {
        out.push_str("\nsome required checks failed\n");
    }

    out
}
