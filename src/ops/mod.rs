//! High-level operations exposed to the CLI.

pub mod doctor;

pub use doctor::{doctor, format_report, CheckResult, DoctorOptions, DoctorReport};
