//! # rail-client
//!
//! HTTP client for the TestRail REST API (v2).
//!
//! Every call targets `{base_url}/index.php?/api/v2/{action}` with basic auth
//! (account email + API key) and JSON bodies. The [`TestRailApi`] trait is the
//! seam the export/import pipelines are written against; [`TestRailClient`]
//! is the reqwest-backed implementation.

mod error;
mod http;

pub use error::{ApiError, DUPLICATE_EMAIL_MESSAGE};
pub use crate::http::endpoint_url;

use rail_config::TestRailConfig;
use serde_json::Value;
use std::time::Duration;

// ── Trait ──────────────────────────────────────────────────────────

/// The subset of the TestRail API railshift consumes: `get_*` and `add_*`
/// actions addressed by their action string (`get_plan/12`,
/// `add_case/55`).
///
/// Calls are awaited one at a time by the pipelines; implementations need
/// not be re-entrant.
#[allow(async_fn_in_trait)]
pub trait TestRailApi {
    /// Issue a GET for `action` and return the parsed body.
    async fn get(&self, action: &str) -> Result<Value, ApiError>;

    /// POST `body` to `action` and return the parsed body.
    async fn post(&self, action: &str, body: &Value) -> Result<Value, ApiError>;
}

impl<T: TestRailApi + ?Sized> TestRailApi for &T {
    async fn get(&self, action: &str) -> Result<Value, ApiError> {
        (**self).get(action).await
    }

    async fn post(&self, action: &str, body: &Value) -> Result<Value, ApiError> {
        (**self).post(action, body).await
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// Basic-auth TestRail client.
pub struct TestRailClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    api_key: String,
}

impl TestRailClient {
    /// Create a client from the `[testrail]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the underlying `reqwest::Client` fails
    /// to build.
    pub fn new(config: &TestRailConfig) -> Result<Self, ApiError> {
        Self::with_credentials(
            &config.base_url,
            &config.username,
            &config.api_key,
            config.timeout(),
        )
    }

    /// Create a client from explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the underlying `reqwest::Client` fails
    /// to build.
    pub fn with_credentials(
        base_url: &str,
        username: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("railshift/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            api_key: api_key.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let resp = request
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await?;
        let resp = crate::http::check_response(resp).await?;
        let body = resp.text().await?;
        crate::http::parse_body(&body)
    }
}

impl TestRailApi for TestRailClient {
    async fn get(&self, action: &str) -> Result<Value, ApiError> {
        let url = endpoint_url(&self.base_url, action);
        tracing::debug!(%url, "GET");
        self.send(self.http.get(&url)).await
    }

    async fn post(&self, action: &str, body: &Value) -> Result<Value, ApiError> {
        let url = endpoint_url(&self.base_url, action);
        tracing::debug!(%url, %body, "POST");
        self.send(self.http.post(&url).json(body)).await
    }
}
