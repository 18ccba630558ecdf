//! TestRail instance credentials.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

const REDACTED: &str = "********";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestRailConfig {
    /// Instance URL (e.g., `https://acme.testrail.io`).
    #[serde(default)]
    pub base_url: String,

    /// Account email used for basic auth.
    #[serde(default)]
    pub username: String,

    /// API key generated under "My Settings".
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TestRailConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TestRailConfig {
    /// Check if every credential needed to call the API is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the required fields that are still empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("base_url", &self.base_url),
            ("username", &self.username),
            ("api_key", &self.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Fail with [`ConfigError::NotConfigured`] unless credentials are complete.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] listing the empty fields, or
    /// [`ConfigError::InvalidValue`] when `base_url` is not an http(s) URL.
    pub fn require(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "testrail",
                missing,
            });
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "testrail.base_url".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.base_url),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Copy with the API key masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            api_key: if self.api_key.is_empty() {
                String::new()
            } else {
                REDACTED.to_string()
            },
            ..self.clone()
        }
    }
}
