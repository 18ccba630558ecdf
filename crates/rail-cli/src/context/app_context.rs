use anyhow::Context;
use rail_client::TestRailClient;
use rail_config::RailConfig;
use rail_core::{EntityKind, EntitySelection};
use rail_migrate::DataDir;

/// Validated config plus the data directory, shared by `export` and `import`.
pub struct AppContext {
    pub config: RailConfig,
    pub store: DataDir,
}

impl AppContext {
    /// Fails when credentials are incomplete or `[entities]` is invalid.
    pub fn for_migration(config: RailConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .context("configuration is not usable for a migration")?;
        let store = DataDir::new(config.general.data_dir.clone());
        Ok(Self { config, store })
    }

    pub fn client(&self) -> anyhow::Result<TestRailClient> {
        TestRailClient::new(&self.config.testrail).context("failed to build TestRail client")
    }

    /// `--only` when given, otherwise the `[entities]` table.
    pub fn selection(&self, only: &[String]) -> anyhow::Result<EntitySelection> {
        if only.is_empty() {
            return Ok(self.config.selection()?);
        }
        let kinds = only
            .iter()
            .map(|name| name.parse::<EntityKind>())
            .collect::<Result<Vec<_>, _>>()
            .context("invalid --only value")?;
        Ok(EntitySelection::only(kinds))
    }
}
