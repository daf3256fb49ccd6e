//! Shared utilities

pub mod diagnostic;
pub mod env;
pub mod process;

pub use diagnostic::Diagnostic;
pub use env::{Env, EnvContext, EnvVar, SystemEnv};
pub use process::{CommandRunner, ProcessBuilder, SystemRunner};
