use rail_config::RailConfig;

use crate::cli::GlobalFlags;
use crate::output;

/// Handle `railshift config`.
pub fn handle(config: &RailConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Err(error) = config.validate() {
        tracing::warn!(%error, "configuration is not usable for a migration yet");
    }
    output::output(&config.redacted(), flags.format)
}
