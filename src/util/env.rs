//! Environment variable access and override contexts.
//!
//! Probes never read or mutate the process environment directly; they go
//! through an [`Env`] source so resolution logic can be tested against a
//! fake environment. The one deliberate process-wide mutation (the PATH
//! prepend derived from an installation home) is modeled as an explicit
//! [`EnvContext`] that the phase driver resolves once and passes to every
//! subsequent probe invocation.

use std::collections::HashMap;

/// Read-only source of environment variables.
pub trait Env {
    /// Get a variable's value, or `None` if unset.
    fn get(&self, name: &str) -> Option<String>;

    /// Get a variable's value if it is set and non-empty.
    fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Env for SystemEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// How an [`EnvVar`] combines with an existing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVarMode {
    /// Replace the existing value entirely.
    Replace,
    /// Prepend to an existing PATH-like variable, joined by the platform
    /// path-list separator.
    Prepend,
}

/// A single environment override.
#[derive(Debug, Clone)]
pub struct EnvVar {
    name: String,
    value: String,
    mode: EnvVarMode,
}

impl EnvVar {
    /// Create a replacing override.
    pub fn replace(name: impl Into<String>, value: impl Into<String>) -> Self {
        EnvVar {
            name: name.into(),
            value: value.into(),
            mode: EnvVarMode::Replace,
        }
    }

    /// Create a prepending override for a PATH-like variable.
    pub fn prepend(name: impl Into<String>, value: impl Into<String>) -> Self {
        EnvVar {
            name: name.into(),
            value: value.into(),
            mode: EnvVarMode::Prepend,
        }
    }

    /// Get the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the final value against the current value, using `sep` to
    /// join in prepend mode. An absent or empty current value yields the
    /// override value alone.
    pub fn resolve(&self, current: Option<&str>, sep: char) -> String {
        match self.mode {
            EnvVarMode::Replace => self.value.clone(),
            EnvVarMode::Prepend => match current.filter(|c| !c.is_empty()) {
                Some(current) => format!("{}{}{}", self.value, sep, current),
                None => self.value.clone(),
            },
        }
    }
}

/// A set of resolved environment overrides applied to every probe
/// invocation.
///
/// Values are resolved exactly once, so every subprocess sees the same
/// override regardless of later mutations to the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvContext {
    vars: Vec<(String, String)>,
}

impl EnvContext {
    /// Create an empty context.
    pub fn new() -> Self {
        EnvContext::default()
    }

    /// Resolve `var` against `env` and record the final pair.
    pub fn set(&mut self, var: &EnvVar, env: &dyn Env, sep: char) {
        let current = env.get(var.name());
        let value = var.resolve(current.as_deref(), sep);
        self.vars.retain(|(name, _)| name != var.name());
        self.vars.push((var.name().to_string(), value));
    }

    /// The resolved `(name, value)` pairs.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Whether any overrides are recorded.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Export every override into the real process environment.
    ///
    /// This is the module's one deliberate global side effect; only the
    /// phase driver calls it, exactly once during `init`.
    pub fn export(&self) {
        for (name, value) in &self.vars {
            std::env::set_var(name, value);
        }
    }
}

/// In-memory environment for tests.
#[derive(Debug, Clone, Default)]
pub struct FakeEnv {
    vars: HashMap<String, String>,
}

impl FakeEnv {
    /// Create an empty fake environment.
    pub fn new() -> Self {
        FakeEnv::default()
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Env for FakeEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
