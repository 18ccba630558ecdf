use std::process::ExitCode;

use rail_config::RailConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;
use crate::output;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: &Commands,
    config: RailConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Export(args) => {
            let ctx = AppContext::for_migration(config)?;
            let summary = commands::export::handle(args, &ctx).await?;
            output::summary(&summary, flags.format)?;
            Ok(commands::exit_code(&summary))
        }
        Commands::Import(args) => {
            let ctx = AppContext::for_migration(config)?;
            let summary = commands::import::handle(args, &ctx).await?;
            output::summary(&summary, flags.format)?;
            Ok(commands::exit_code(&summary))
        }
        Commands::Entities => {
            commands::entities::handle(&config, flags)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            commands::config::handle(&config, flags)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
