//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the command needs is missing required fields.
    #[error("[{section}] is not configured; missing: {}", missing.join(", "))]
    NotConfigured {
        section: &'static str,
        missing: Vec<&'static str>,
    },

    /// `[entities]` names a kind railshift does not know.
    #[error("Unknown entity '{0}' in [entities]")]
    UnknownEntity(String),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
