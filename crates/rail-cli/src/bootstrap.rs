use anyhow::Context;
use rail_config::RailConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config, then apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<RailConfig> {
    if let Some(path) = &flags.config {
        anyhow::ensure!(
            path.is_file(),
            "config file '{}' does not exist",
            path.display()
        );
    }

    let mut config = RailConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load railshift configuration")?;

    if let Some(data_dir) = &flags.data_dir {
        config.general.data_dir.clone_from(data_dir);
    }

    Ok(config)
}
