//! Shared HTTP helpers for the TestRail client.
//!
//! URL construction, status checks (non-success -> [`ApiError::Api`] with the
//! response body), and body parsing live here so the client itself stays a
//! thin request builder.

use serde_json::Value;

use crate::error::ApiError;

/// Path every API v2 action hangs off.
const API_PATH: &str = "index.php?/api/v2/";

/// Full URL for `action`, e.g. `get_tests/4&offset=0&limit=250`.
///
/// TestRail routes through the query string, so the action (including any
/// `&key=value` filters) is appended verbatim.
#[must_use]
pub fn endpoint_url(base_url: &str, action: &str) -> String {
    format!(
        "{}/{API_PATH}{}",
        base_url.trim_end_matches('/'),
        action.trim_start_matches('/')
    )
}

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success; otherwise the status and body
/// become an [`ApiError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if !resp.status().is_success() {
        return Err(ApiError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse a response body as JSON. Some `add_*` actions answer with an empty
/// body, which parses as `null`.
pub fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}
