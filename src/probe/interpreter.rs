//! Interpreter resolution.
//!
//! Decides which Python executable to invoke and what environment it must
//! run under:
//! 1. `python3` by default, falling back to `python` when `python3` is
//!    absent from the search path
//! 2. `PYTHON` (set and non-empty) overrides the chosen name entirely
//! 3. the platform executable suffix is appended when missing
//! 4. `PYTHON3_HOME` derives the expected binary subdirectory; a missing
//!    subdirectory fails init, an existing one yields a PATH-prepend
//!    override reused by every later probe

use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::core::version::PythonVersion;
use crate::probe::errors::ProbeError;
use crate::probe::platform::Platform;
use crate::util::env::{Env, EnvContext, EnvVar};
use crate::util::process::{find_executable, CommandRunner, ProcessBuilder};

/// Default interpreter name.
pub const DEFAULT_PROGRAM: &str = "python3";

/// Fallback when the default is not on the search path.
pub const FALLBACK_PROGRAM: &str = "python";

/// Environment variable overriding the interpreter entirely.
pub const PYTHON_ENV: &str = "PYTHON";

/// Environment variable naming the installation root.
pub const HOME_ENV: &str = "PYTHON3_HOME";

/// Pick the interpreter program name from the environment and platform.
pub fn resolve_program(platform: Platform, env: &dyn Env, python3_on_path: bool) -> String {
    let chosen = if python3_on_path {
        DEFAULT_PROGRAM
    } else {
        FALLBACK_PROGRAM
    };

    let program = env
        .get_non_empty(PYTHON_ENV)
        .unwrap_or_else(|| chosen.to_string());

    platform.with_exe_suffix(program)
}

/// A resolved interpreter and the environment it runs under.
#[derive(Debug, Clone)]
pub struct Interpreter {
    program: String,
    home: Option<PathBuf>,
    bin_dir: Option<PathBuf>,
    env: EnvContext,
}

impl Interpreter {
    /// Resolve the interpreter from the real search path and `env`.
    pub fn resolve(platform: Platform, env: &dyn Env) -> Result<Self, ProbeError> {
        let python3_on_path = find_executable(DEFAULT_PROGRAM).is_some();
        Self::resolve_with(platform, env, python3_on_path)
    }

    /// Resolve with the `python3`-presence decision already made.
    pub(crate) fn resolve_with(
        platform: Platform,
        env: &dyn Env,
        python3_on_path: bool,
    ) -> Result<Self, ProbeError> {
        let program = resolve_program(platform, env, python3_on_path);

        let mut ctx = EnvContext::new();
        let mut home = None;
        let mut bin_dir = None;

        if let Some(raw) = env.get_non_empty(HOME_ENV) {
            let home_path = PathBuf::from(raw);
            let bin = platform.home_bin_dir(&home_path);
            if !bin.is_dir() {
                return Err(ProbeError::HomeBinMissing { path: bin });
            }
            tracing::debug!("prepending {} to PATH", bin.display());
            ctx.set(
                &EnvVar::prepend("PATH", bin.to_string_lossy()),
                env,
                platform.path_list_separator(),
            );
            home = Some(home_path);
            bin_dir = Some(bin);
        }

        Ok(Interpreter {
            program,
            home,
            bin_dir,
            env: ctx,
        })
    }

    /// The resolved program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The installation root, when `PYTHON3_HOME` supplied one.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// The home-derived binary directory, when one was resolved.
    pub fn home_bin_dir(&self) -> Option<&Path> {
        self.bin_dir.as_deref()
    }

    /// The environment overrides applied to every probe invocation.
    pub fn env(&self) -> &EnvContext {
        &self.env
    }

    /// Where the interpreter executable actually lives on the search
    /// path, if it can be found.
    pub fn location(&self) -> Option<PathBuf> {
        find_executable(&self.program)
    }

    /// Start building an interpreter invocation.
    pub fn command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).env_context(&self.env)
    }

    /// Run `-c <code>` and return the raw captured stdout.
    pub fn run_snippet(
        &self,
        runner: &dyn CommandRunner,
        cwd: Option<&Path>,
        code: &str,
    ) -> Result<String, ProbeError> {
        let mut cmd = self.command().arg("-c").arg(code);
        if let Some(cwd) = cwd {
            cmd = cmd.cwd(cwd);
        }

        let command = cmd.display_command();
        let out = runner
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

    /// Ask the interpreter for one component of `sys.version_info`.
    fn version_component(
        &self,
        runner: &dyn CommandRunner,
        cwd: Option<&Path>,
        index: usize,
    ) -> Result<u32, ProbeError> {
        let code = format!("import sys; print(sys.version_info[{}])", index);
        let out = self.run_snippet(runner, cwd, &code)?;
        out.trim().parse().map_err(|_| ProbeError::UnexpectedOutput {
            command: format!("{} -c {}", self.program, code),
            output: out,
        })
    }

    /// Probe the interpreter's (major, minor) version.
    pub fn probe_version(
        &self,
        runner: &dyn CommandRunner,
        cwd: Option<&Path>,
    ) -> Result<PythonVersion, ProbeError> {
        let major = self.version_component(runner, cwd, 0)?;
        let minor = self.version_component(runner, cwd, 1)?;
        Ok(PythonVersion::new(major, minor))
    }

    /// Ask an auxiliary module for its own include directory; returns raw
    /// captured stdout.
    pub fn module_include_dir(
        &self,
        runner: &dyn CommandRunner,
        cwd: Option<&Path>,
        module: &str,
    ) -> Result<String, ProbeError> {
        let code = format!("import {m}; print({m}.get_include())", m = module);
        self.run_snippet(runner, cwd, &code)
    }
}
