//! Project ids and local paths.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default project id on both instances.
const fn default_project_id() -> u64 {
    2
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project exported from.
    #[serde(default = "default_project_id")]
    pub source_id: u64,

    /// Project imported into.
    #[serde(default = "default_project_id")]
    pub destination_id: u64,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_id: default_project_id(),
            destination_id: default_project_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding the exported JSON files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
