//! Flag synthesis strategies.
//!
//! Two ways to learn the toolchain's build metadata, chosen once at init:
//! a dedicated config tool when one exists, or asking the interpreter to
//! introspect its own configuration. Both produce the same [`FlagSet`]
//! capability set, so later phases never branch on how it was sourced.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::Serialize;

use crate::flags::{parse_include_flags, trim_probe_line};
use crate::probe::config_tool::ConfigToolProbe;
use crate::probe::errors::ProbeError;
use crate::probe::interpreter::Interpreter;
use crate::probe::platform::Platform;
use crate::probe::sysconfig::SysconfigReport;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Build metadata synthesized for one phase. Value object; created fresh
/// each phase and never shared across phases.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlagSet {
    /// Include search directories, in discovery order.
    pub include_dirs: Vec<PathBuf>,
    /// Compiler flags as a single string.
    pub cflags: String,
    /// Directory holding the runtime library.
    pub lib_dir: Option<PathBuf>,
    /// Runtime library linker short name.
    pub lib_name: Option<String>,
    /// Installation prefix.
    pub prefix: Option<PathBuf>,
    /// Raw linker-flag text.
    pub ldflags: String,
}

/// Everything a strategy needs to run one probe.
pub struct ProbeContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub interpreter: &'a Interpreter,
    pub platform: Platform,
    /// Probe working directory (the project dir, when the host knows it).
    pub cwd: Option<&'a Path>,
    /// Caller-supplied extra arguments for config-tool invocations.
    pub args: &'a [String],
}

/// How build metadata is sourced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Query the dedicated config tool.
    ConfigTool { tool: String },
    /// Query the interpreter's own configuration, with the installation
    /// layout next to the interpreter as filesystem fallback.
    Introspection,
}

impl ProbeStrategy {
    /// Select the strategy for a resolved config tool.
    pub fn select(config_tool: &ConfigToolProbe) -> Self {
        match config_tool.tool() {
            Some(tool) => ProbeStrategy::ConfigTool {
                tool: tool.to_string(),
            },
            None => ProbeStrategy::Introspection,
        }
    }

    /// Short label for logs and reports.
    pub fn describe(&self) -> &'static str {
        match self {
            ProbeStrategy::ConfigTool { .. } => "config-tool",
            ProbeStrategy::Introspection => "introspection",
        }
    }

    /// Synthesize compile-phase metadata: include directories and
    /// compiler flags.
    pub fn compile_flags(&self, probe: &ProbeContext<'_>) -> Result<FlagSet, ProbeError> {
        match self {
            ProbeStrategy::ConfigTool { tool } => {
                let out = run_config_tool(probe, tool, &["--includes"])?;
                Ok(FlagSet {
                    include_dirs: parse_include_flags(&out),
                    ..FlagSet::default()
                })
            }
            ProbeStrategy::Introspection => {
                let report = SysconfigReport::query(probe.interpreter, probe.runner, probe.cwd)?;

                let include_dir = report
                    .include
                    .as_deref()
                    .map(PathBuf::from)
                    .filter(|dir| dir.is_dir());
                let include_dir = match include_dir {
                    Some(dir) => dir,
                    None => derive_include_dir(probe.platform, probe.interpreter)?,
                };

                Ok(FlagSet {
                    include_dirs: vec![include_dir],
                    cflags: report.cflags.unwrap_or_default(),
                    ..FlagSet::default()
                })
            }
        }
    }

    /// Synthesize link-phase metadata.
    ///
    /// Config-tool mode yields a raw ldflags string plus the installation
    /// prefix; introspection mode yields structured library directory,
    /// short name, and prefix with no raw text at all.
    pub fn link_flags(&self, probe: &ProbeContext<'_>, embed: bool) -> Result<FlagSet, ProbeError> {
        match self {
            ProbeStrategy::ConfigTool { tool } => {
                let mut requests = vec!["--ldflags"];
                if embed {
                    requests.push("--embed");
                }
                let raw = run_config_tool(probe, tool, &requests)?;
                let ldflags =
                    trim_probe_line(&raw, probe.platform.is_windows()).to_string();

                let prefix_out = run_config_tool(probe, tool, &["--prefix"])?;
                let prefix = trim_probe_line(&prefix_out, probe.platform.is_windows());
                let prefix = (!prefix.is_empty()).then(|| PathBuf::from(prefix));

                Ok(FlagSet {
                    ldflags,
                    prefix,
                    ..FlagSet::default()
                })
            }
            ProbeStrategy::Introspection => {
                let report = SysconfigReport::query(probe.interpreter, probe.runner, probe.cwd)?;

                let lib_dir = report
                    .libdir
                    .as_deref()
                    .map(PathBuf::from)
                    .filter(|dir| dir.is_dir());
                let lib_dir = match lib_dir {
                    Some(dir) => dir,
                    None => derive_lib_dir(probe.platform, probe.interpreter)?,
                };

                Ok(FlagSet {
                    lib_dir: Some(lib_dir),
                    lib_name: report.lib_short_name(probe.platform),
                    prefix: report.prefix.as_deref().map(PathBuf::from),
                    ..FlagSet::default()
                })
            }
        }
    }
}

/// Invoke the config tool with the given requests plus caller extras.
fn run_config_tool(
    probe: &ProbeContext<'_>,
    tool: &str,
    requests: &[&str],
) -> Result<String, ProbeError> {
    let mut cmd = ProcessBuilder::new(tool)
        .args(requests)
        .args(probe.args)
        .env_context(probe.interpreter.env());
    if let Some(cwd) = probe.cwd {
        cmd = cmd.cwd(cwd);
    }

    let command = cmd.display_command();
    let out = probe
        .runner
        .capture(&cmd)
        .map_err(|e| ProbeError::command_failed(&command, e))?;

    if !out.is_success() {
        return Err(ProbeError::command_failed(
            &command,
            anyhow!("exited with status {}", out.status),
        ));
    }

    Ok(out.stdout)
}

/// Derive the include directory from the installation layout: the
/// `include` sibling under the home root first, then under the root next
/// to wherever the interpreter actually lives.
pub(crate) fn derive_include_dir(
    platform: Platform,
    interpreter: &Interpreter,
) -> Result<PathBuf, ProbeError> {
    let mut expected_root = None;

    for root in layout_roots(platform, interpreter) {
        let include = root.join("include");
        if include.is_dir() {
            return Ok(include);
        }
        expected_root.get_or_insert(root);
    }

    Err(ProbeError::IncludeDirMissing {
        root: expected_root.unwrap_or_else(|| PathBuf::from(interpreter.program())),
    })
}

/// Derive the library directory analogously (`libs` on Windows, `lib`
/// elsewhere).
pub(crate) fn derive_lib_dir(
    platform: Platform,
    interpreter: &Interpreter,
) -> Result<PathBuf, ProbeError> {
    let mut expected = None;

    for root in layout_roots(platform, interpreter) {
        let lib = root.join(platform.lib_dir_name());
        if lib.is_dir() {
            return Ok(lib);
        }
        expected.get_or_insert(lib);
    }

    Err(ProbeError::LibDirMissing {
        path: expected.unwrap_or_else(|| PathBuf::from(interpreter.program())),
    })
}

/// Installation roots to try, in order: the home-derived binary
/// directory's root, then the root of the interpreter's actual location.
fn layout_roots(platform: Platform, interpreter: &Interpreter) -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(bin) = interpreter.home_bin_dir() {
        if let Some(root) = platform.install_root_of_bin(bin) {
            roots.push(root);
        }
    }

    if let Some(location) = interpreter.location() {
        if let Some(dir) = location.parent() {
            if let Some(root) = platform.install_root_of_bin(dir) {
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
    }

    roots
}
