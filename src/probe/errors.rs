//! Fatal probe error types.
//!
//! Everything here stops the current phase. Recoverable conditions go
//! through [`crate::util::diagnostic`] instead and never surface as a
//! `ProbeError`.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::version::PythonVersion;

/// Exit status reserved for a missing config tool on a platform where it
/// is required; every later phase depends on it, so init surfaces it
/// immediately.
pub const CONFIG_TOOL_EXIT_CODE: i32 = 2;

/// Fatal conditions raised while probing the Python toolchain.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ProbeError {
    /// `PYTHON3_HOME` was supplied but its binary subdirectory is absent.
    #[error("python installation home has no binary directory: {}", path.display())]
    #[diagnostic(
        code(pyprobe::probe::home_bin_missing),
        help("PYTHON3_HOME must point at an installation root containing the interpreter")
    )]
    HomeBinMissing { path: PathBuf },

    /// Neither config tool variant was found where one is required.
    #[error("python config tool not found (tried `{versioned}`, `{unversioned}`)")]
    #[diagnostic(
        code(pyprobe::probe::config_tool_missing),
        help("install the python3 development package (python3-dev / python3-devel)")
    )]
    ConfigToolMissing {
        versioned: String,
        unversioned: String,
    },

    /// Fallback include-directory derivation found nothing.
    #[error("python include directory not found under {}", root.display())]
    #[diagnostic(code(pyprobe::probe::include_dir_missing))]
    IncludeDirMissing { root: PathBuf },

    /// Fallback library-directory derivation found nothing.
    #[error("python library directory not found: {}", path.display())]
    #[diagnostic(code(pyprobe::probe::lib_dir_missing))]
    LibDirMissing { path: PathBuf },

    /// A probe subprocess could not be spawned or exited non-zero.
    #[error("probe command failed: `{command}`")]
    #[diagnostic(code(pyprobe::probe::command_failed))]
    CommandFailed {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// A probe subprocess produced output we could not interpret.
    #[error("unexpected output from `{command}`: {output:?}")]
    #[diagnostic(code(pyprobe::probe::unexpected_output))]
    UnexpectedOutput { command: String, output: String },

    /// The probed interpreter is older than the configured minimum.
    #[error("python {found} is below the required minimum {required}")]
    #[diagnostic(
        code(pyprobe::probe::version_below_minimum),
        help("point PYTHON or PYTHON3_HOME at a newer installation")
    )]
    VersionBelowMinimum {
        found: PythonVersion,
        required: PythonVersion,
    },

    /// A phase was invoked before `init` completed.
    #[error("python module used before init")]
    #[diagnostic(code(pyprobe::probe::not_initialized))]
    NotInitialized,
}

impl ProbeError {
    /// The process exit status a host should terminate with for this
    /// error during `init`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::ConfigToolMissing { .. } => CONFIG_TOOL_EXIT_CODE,
            _ => 1,
        }
    }

    /// Build a `CommandFailed` from a command display string.
    pub fn command_failed(command: impl Into<String>, source: anyhow::Error) -> Self {
        ProbeError::CommandFailed {
            command: command.into(),
            source,
        }
    }
}
