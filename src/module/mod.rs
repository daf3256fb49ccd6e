//! The build-module phase driver.
//!
//! A [`PythonModule`] is embedded by a host build tool and driven through
//! three ordered phases: `init` resolves the interpreter, its
//! environment, and the probing strategy; `compile` synthesizes include
//! directories (plus auxiliary module includes); `link` synthesizes,
//! filters, and partitions linker flags. Phases share the state resolved
//! at init and must not run concurrently; `init` is non-reentrant.

use std::path::{Path, PathBuf};

use crate::core::build::BuildDescription;
use crate::core::config::ModuleConfig;
use crate::core::version::{PythonVersion, VersionPolicy};
use crate::flags::{delete_substrings, partition_link_flags, trim_probe_line};
use crate::probe::config_tool::ConfigToolProbe;
use crate::probe::errors::ProbeError;
use crate::probe::interpreter::Interpreter;
use crate::probe::platform::Platform;
use crate::probe::strategy::{FlagSet, ProbeContext, ProbeStrategy};
use crate::util::diagnostic::{self, suggestions, Diagnostic};
use crate::util::env::{Env, SystemEnv};
use crate::util::process::{CommandRunner, SystemRunner};

/// Environment toggle for embed-mode link behavior. Boolean string,
/// default `"0"`.
pub const EMBED_ENV: &str = "MKN_PYTHON_LIB_EMBED";

/// State resolved once at init and shared by the later phases.
#[derive(Debug, Clone)]
pub struct ProbeState {
    /// The resolved interpreter and its environment overrides.
    pub interpreter: Interpreter,
    /// Config-tool resolution outcome.
    pub config_tool: ConfigToolProbe,
    /// The strategy selected for flag synthesis.
    pub strategy: ProbeStrategy,
    /// The probed interpreter version, when it could be determined.
    pub version: Option<PythonVersion>,
}

/// The Python build module.
pub struct PythonModule {
    platform: Platform,
    runner: Box<dyn CommandRunner>,
    env: Box<dyn Env>,
    version_policy: VersionPolicy,
    embed_override: Option<bool>,
    export_env: bool,
    config_tool_override: Option<ConfigToolProbe>,
    state: Option<ProbeState>,
}

impl Default for PythonModule {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonModule {
    /// Create a module using the host platform, real environment, and
    /// real subprocess spawner.
    pub fn new() -> Self {
        PythonModule {
            platform: Platform::host(),
            runner: Box::new(SystemRunner),
            env: Box::new(SystemEnv),
            version_policy: VersionPolicy::default(),
            embed_override: None,
            export_env: true,
            config_tool_override: None,
            state: None,
        }
    }

    /// Override the platform capability (tests, cross-checks).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Substitute the command runner.
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Substitute the environment source.
    pub fn with_env(mut self, env: impl Env + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Set the minimum-version enforcement policy.
    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }

    /// Force embed mode on or off instead of reading the environment
    /// toggle.
    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed_override = Some(embed);
        self
    }

    /// Skip exporting the PATH override into the real process
    /// environment (tests).
    pub fn with_env_export(mut self, export: bool) -> Self {
        self.export_env = export;
        self
    }

    /// Use an already-resolved config-tool outcome instead of searching
    /// the path.
    pub fn with_config_tool(mut self, probe: ConfigToolProbe) -> Self {
        self.config_tool_override = Some(probe);
        self
    }

    /// The state resolved by `init`, if it has run.
    pub fn state(&self) -> Option<&ProbeState> {
        self.state.as_ref()
    }

    /// Whether embed-mode link behavior is requested.
    pub fn embed(&self) -> bool {
        match self.embed_override {
            Some(embed) => embed,
            None => parse_flag(self.env.get(EMBED_ENV).as_deref()),
        }
    }

    /// Resolve the interpreter, environment, config tool, strategy, and
    /// version. Must complete before `compile` or `link`.
    pub fn init(&mut self, config: &ModuleConfig) -> Result<(), ProbeError> {
        let interpreter = Interpreter::resolve(self.platform, self.env.as_ref())?;

        // The one deliberate process-global side effect: make the PATH
        // prepend visible to every subsequent lookup and subprocess.
        if self.export_env {
            interpreter.env().export();
        }

        let config_tool = match self.config_tool_override.clone() {
            Some(probe) => probe,
            None => ConfigToolProbe::resolve(self.platform),
        };
        config_tool.require()?;

        let strategy = ProbeStrategy::select(&config_tool);
        tracing::info!(
            "python probe: interpreter=`{}` strategy={}",
            interpreter.program(),
            strategy.describe()
        );

        let version = match interpreter.probe_version(self.runner.as_ref(), None) {
            Ok(version) => {
                tracing::info!("python version {}", version);
                Some(version)
            }
            Err(err) => {
                if config.min.is_some() && self.version_policy == VersionPolicy::Deny {
                    return Err(err);
                }
                diagnostic::emit(
                    &Diagnostic::warning("could not determine python version")
                        .with_context(err.to_string())
                        .with_suggestion(suggestions::NO_INTERPRETER),
                );
                None
            }
        };

        if let (Some(found), Some(required)) = (version, config.min) {
            if found < required {
                match self.version_policy {
                    VersionPolicy::Deny => {
                        return Err(ProbeError::VersionBelowMinimum { found, required });
                    }
                    VersionPolicy::Warn => {
                        diagnostic::emit(&Diagnostic::warning(format!(
                            "python {} is below the required minimum {}",
                            found, required
                        )));
                    }
                }
            }
        }

        self.state = Some(ProbeState {
            interpreter,
            config_tool,
            strategy,
            version,
        });
        Ok(())
    }

    /// Synthesize and register compile-phase flags: the toolchain's
    /// include directories plus one per resolvable auxiliary module.
    pub fn compile(
        &self,
        build: &mut dyn BuildDescription,
        config: &ModuleConfig,
    ) -> Result<FlagSet, ProbeError> {
        let state = self.state.as_ref().ok_or(ProbeError::NotInitialized)?;
        let cwd = build.project_dir().to_path_buf();
        let probe = ProbeContext {
            runner: self.runner.as_ref(),
            interpreter: &state.interpreter,
            platform: self.platform,
            cwd: Some(&cwd),
            args: &config.args,
        };

        let mut flags = state.strategy.compile_flags(&probe)?;

        for dir in &flags.include_dirs {
            register_include_dir(build, dir);
        }

        for name in &config.with {
            match self.auxiliary_include_dir(state, &cwd, name) {
                Ok(dir) => {
                    if register_include_dir(build, &dir) {
                        tracing::debug!("`{}` include dir: {}", name, dir.display());
                        flags.include_dirs.push(dir);
                    } else {
                        diagnostic::emit(&Diagnostic::warning(format!(
                            "include directory reported by `{}` does not exist: {}",
                            name,
                            dir.display()
                        )));
                    }
                }
                Err(err) => {
                    diagnostic::emit(
                        &Diagnostic::warning(format!(
                            "failed to resolve include dir for `{}`",
                            name
                        ))
                        .with_context(err.to_string())
                        .with_suggestion(suggestions::MODULE_IMPORT_FAILED),
                    );
                }
            }
        }

        Ok(flags)
    }

    /// Synthesize link-phase flags, filter and partition them, and
    /// register the structured parts with the build description.
    pub fn link(
        &self,
        build: &mut dyn BuildDescription,
        config: &ModuleConfig,
    ) -> Result<FlagSet, ProbeError> {
        let state = self.state.as_ref().ok_or(ProbeError::NotInitialized)?;
        let embed = self.embed();
        let cwd = build.project_dir().to_path_buf();
        let probe = ProbeContext {
            runner: self.runner.as_ref(),
            interpreter: &state.interpreter,
            platform: self.platform,
            cwd: Some(&cwd),
            args: &config.args,
        };

        let mut flags = state.strategy.link_flags(&probe, embed)?;

        let filtered = delete_substrings(&flags.ldflags, &config.delete);
        let prefix_lib = flags
            .prefix
            .as_ref()
            .map(|p| p.join("lib"))
            .filter(|dir| dir.is_dir());
        let parts = partition_link_flags(&filtered, prefix_lib.as_deref(), embed);

        if let Some(ref dir) = flags.lib_dir {
            build.add_lib_dir(dir);
        }
        if let Some(dir) = parts.lib_dir {
            build.add_lib_dir(&dir);
            flags.lib_dir.get_or_insert(dir);
        }

        let mut libs = parts.libs;
        if embed {
            if let Some(ref name) = flags.lib_name {
                if !libs.contains(name) {
                    libs.push(name.clone());
                }
            }
        }
        for name in &libs {
            build.add_lib(name);
        }
        if flags.lib_name.is_none() {
            flags.lib_name = libs.first().cloned();
        }

        flags.ldflags = parts.rest;
        if !flags.ldflags.is_empty() && !build.output_kind().is_static_archive() {
            build.prepend_ldflags(&flags.ldflags);
        }

        Ok(flags)
    }

    /// Ask the interpreter for an auxiliary module's include directory.
    fn auxiliary_include_dir(
        &self,
        state: &ProbeState,
        cwd: &Path,
        module: &str,
    ) -> Result<PathBuf, ProbeError> {
        let raw =
            state
                .interpreter
                .module_include_dir(self.runner.as_ref(), Some(cwd), module)?;
        Ok(PathBuf::from(trim_probe_line(
            &raw,
            self.platform.is_windows(),
        )))
    }
}

/// Parse a boolean-string toggle; unset and `"0"` are false.
fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

/// Register an existing include directory on the build description and
/// every reverse-dependent sub-project. Returns whether it existed.
fn register_include_dir(build: &mut dyn BuildDescription, dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    build.add_include_dir(dir);
    build.for_each_dependent(&mut |dep| dep.add_include_dir(dir));
    true
}
