use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Download enabled entities from the source project into the data directory.
    Export(MigrateArgs),
    /// Re-create exported entities in the destination project.
    Import(MigrateArgs),
    /// List every entity kind and whether it is enabled.
    Entities,
    /// Print the effective configuration (API key redacted).
    Config,
}

#[derive(Clone, Debug, Default, Args)]
pub struct MigrateArgs {
    /// Process only these kinds, ignoring `[entities]` (comma separated).
    #[arg(long, value_delimiter = ',', value_name = "KIND")]
    pub only: Vec<String>,

    /// Override the configured project id (source for export, destination for import).
    #[arg(long, value_name = "ID")]
    pub project: Option<u64>,
}
