//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use pyprobe::PythonVersion;

/// pyprobe - Python toolchain probe and build-flag synthesizer
#[derive(Parser)]
#[command(name = "pyprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the toolchain and print the synthesized build flags
    Flags(FlagsArgs),

    /// Check the host Python environment
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Module config file (TOML; recognized keys: args, delete, with, min)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Auxiliary module whose include dir is appended (repeatable)
    #[arg(long = "with", value_name = "MODULE")]
    pub with: Vec<String>,

    /// Substring deleted from the raw linker flags (repeatable)
    #[arg(long, value_name = "SUBSTRING")]
    pub delete: Vec<String>,

    /// Minimum interpreter version, major[.minor]
    #[arg(long)]
    pub min: Option<PythonVersion>,

    /// Fail instead of warning when below the minimum version
    #[arg(long)]
    pub strict_min: bool,

    /// Extra argument passed through to config-tool invocations
    #[arg(long = "probe-arg", value_name = "ARG")]
    pub probe_args: Vec<String>,

    /// Probe embed-mode link flags (overrides MKN_PYTHON_LIB_EMBED)
    #[arg(long)]
    pub embed: bool,

    /// Show compile flags only
    #[arg(long)]
    pub compile: bool,

    /// Show link flags only
    #[arg(long)]
    pub link: bool,

    /// Treat the project as a static archive (no raw link text applied)
    #[arg(long)]
    pub static_lib: bool,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Directory probes run in (defaults to the current directory)
    #[arg(long)]
    pub project_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct DoctorArgs {
    /// Show optional checks, paths, and environment details
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
