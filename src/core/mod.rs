//! Core data model: build-description capability, module configuration,
//! and interpreter versions.

pub mod build;
pub mod config;
pub mod version;

pub use build::{BuildDescription, HostProject, OutputKind};
pub use config::{ConfigError, ModuleConfig};
pub use version::{PythonVersion, VersionPolicy};
