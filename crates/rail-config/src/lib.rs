//! # rail-config
//!
//! Layered configuration loading for railshift using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RAILSHIFT_*` prefix, `__` as separator)
//! 2. Project-level `railshift.toml` (or an explicit `--config` file)
//! 3. User-level `~/.config/railshift/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `RAILSHIFT_TESTRAIL__API_KEY` -> `testrail.api_key`,
//! `RAILSHIFT_ENTITIES__TEST_PLANS=true` -> `entities.test_plans`.
//!
//! # Usage
//!
//! ```no_run
//! use rail_config::RailConfig;
//!
//! let config = RailConfig::load_with_dotenv(None).expect("config");
//! let selection = config.selection().expect("known entity names");
//! println!("exporting from project {}", config.project.source_id);
//! # let _ = selection;
//! ```

mod error;
mod general;
mod testrail;

pub use error::ConfigError;
pub use general::{GeneralConfig, ProjectConfig};
pub use testrail::TestRailConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use rail_core::{CoreError, EntityKind, EntitySelection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "railshift.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "RAILSHIFT_";

/// Kinds enabled when `[entities]` does not mention them.
const DEFAULT_ENABLED: &[EntityKind] = &[EntityKind::Milestones, EntityKind::TestCases];

fn default_entities() -> BTreeMap<String, bool> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), DEFAULT_ENABLED.contains(&kind)))
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RailConfig {
    #[serde(default)]
    pub testrail: TestRailConfig,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    /// Entity name -> enabled flag.
    #[serde(default = "default_entities")]
    pub entities: BTreeMap<String, bool>,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            testrail: TestRailConfig::default(),
            project: ProjectConfig::default(),
            general: GeneralConfig::default(),
            entities: default_entities(),
        }
    }
}

impl RailConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(explicit).extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// `explicit` replaces the project-local `railshift.toml` layer.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local or explicit config
        let local_path = explicit.map_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("railshift").join("config.toml"))
    }

    /// The configured entity selection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEntity`] when `[entities]` names a kind
    /// that does not exist.
    pub fn selection(&self) -> Result<EntitySelection, ConfigError> {
        EntitySelection::from_flags(
            self.entities
                .iter()
                .map(|(name, enabled)| (name.as_str(), *enabled)),
        )
        .map_err(|error| match error {
            CoreError::UnknownEntity(name) => ConfigError::UnknownEntity(name),
            other => ConfigError::InvalidValue {
                field: "entities".into(),
                reason: other.to_string(),
            },
        })
    }

    /// Check everything an export or import needs.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: incomplete `[testrail]` credentials
    /// or an unknown entity name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.testrail.require()?;
        self.selection()?;
        Ok(())
    }

    /// Copy safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            testrail: self.testrail.redacted(),
            ..self.clone()
        }
    }
}
