use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, MigrateArgs};

/// Top-level CLI parser for the `railshift` binary.
#[derive(Debug, Parser)]
#[command(
    name = "railshift",
    version,
    about = "Copy TestRail projects between instances"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ./railshift.toml
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for exported JSON files (overrides `general.data_dir`)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format: json, text
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging, including request bodies)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            config: self.config.clone(),
            data_dir: self.data_dir.clone(),
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}
