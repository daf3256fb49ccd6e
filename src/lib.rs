//! pyprobe - Python toolchain probe and build-flag synthesizer
//!
//! This crate discovers a Python installation on the host machine and
//! synthesizes the compiler/linker flags a native module needs to embed
//! or extend Python, feeding them into a caller-supplied build
//! description across `init`/`compile`/`link` phases.

pub mod core;
pub mod flags;
pub mod module;
pub mod ops;
pub mod probe;
pub mod util;

/// Test utilities and mocks for pyprobe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock command runner so probe logic can be
/// exercised without a Python installation.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    build::BuildDescription, build::HostProject, build::OutputKind, config::ModuleConfig,
    version::PythonVersion, version::VersionPolicy,
};

pub use crate::module::{ProbeState, PythonModule};
pub use crate::probe::{FlagSet, Platform, ProbeError, ProbeStrategy};
