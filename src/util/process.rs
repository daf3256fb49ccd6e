//! Subprocess execution for toolchain probes.
//!
//! Every probe is a blocking subprocess call with captured stdout; the
//! [`CommandRunner`] trait is the seam that lets tests substitute a mock
//! for the real spawner.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::util::env::EnvContext;

/// Builder for a single probe invocation.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable for this invocation.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .push((key.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Apply every override from a resolved environment context.
    pub fn env_context(mut self, ctx: &EnvContext) -> Self {
        for (key, value) in ctx.vars() {
            self.env.push((key.clone(), value.clone()));
        }
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment overrides.
    pub fn get_envs(&self) -> &[(String, String)] {
        &self.env
    }

    /// Display the command for diagnostics and mock matching.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }
}

/// Captured result of a probe invocation.
#[derive(Debug, Clone)]
pub struct Captured {
    /// Captured standard output as text.
    pub stdout: String,
    /// Process exit status code; `0` is success.
    pub status: i32,
}

impl Captured {
    /// Create a successful capture with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Captured {
            stdout: stdout.into(),
            status: 0,
        }
    }

    /// Create a failed capture.
    pub fn failure(status: i32) -> Self {
        Captured {
            stdout: String::new(),
            status,
        }
    }

    /// Whether the process exited successfully.
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Executes probe commands, blocking until exit.
pub trait CommandRunner {
    /// Run the command and capture its standard output.
    fn capture(&self, cmd: &ProcessBuilder) -> Result<Captured>;
}

/// The real subprocess spawner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&self, cmd: &ProcessBuilder) -> Result<Captured> {
        let output = cmd
            .build_command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", cmd.get_program().display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                "`{}` exited with {:?}: {}",
                cmd.display_command(),
                output.status.code(),
                stderr.trim()
            );
        }

        Ok(Captured {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            status: output.status.code().unwrap_or(-1),
        })
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::env::{EnvContext, EnvVar, FakeEnv};

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("python3").args(["-c", "import sys"]);
        assert_eq!(pb.display_command(), "python3 -c import sys");
    }

    #[test]
    fn test_env_context_applied() {
        let mut fake = FakeEnv::new();
        fake.set("PATH", "/usr/bin");
        let mut ctx = EnvContext::new();
        ctx.set(&EnvVar::prepend("PATH", "/opt/py/bin"), &fake, ':');

        let pb = ProcessBuilder::new("python3").env_context(&ctx);
        assert_eq!(
            pb.get_envs(),
            &[("PATH".to_string(), "/opt/py/bin:/usr/bin".to_string())]
        );
    }

    #[test]
    fn test_system_runner_captures_stdout() {
        let out = SystemRunner
            .capture(&ProcessBuilder::new("echo").arg("hello"))
            .unwrap();
        assert!(out.is_success());
        assert!(out.stdout.contains("hello"));
    }
}
