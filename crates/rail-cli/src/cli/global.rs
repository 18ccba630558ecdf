use std::path::PathBuf;

use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}
