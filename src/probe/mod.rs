//! Toolchain probing: interpreter and config-tool resolution, flag
//! synthesis strategies, and interpreter self-introspection.

pub mod config_tool;
pub mod errors;
pub mod interpreter;
pub mod platform;
pub mod strategy;
pub mod sysconfig;

pub use config_tool::ConfigToolProbe;
pub use errors::ProbeError;
pub use interpreter::Interpreter;
pub use platform::Platform;
pub use strategy::{FlagSet, ProbeContext, ProbeStrategy};
pub use sysconfig::SysconfigReport;
