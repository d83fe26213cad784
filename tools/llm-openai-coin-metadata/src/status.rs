//! Health check against the public OpenAI status page.

use {
    blogcoin_toolkit::{AnyResult, StatusCode},
    reqwest::Client,
    serde::Deserialize,
};

/// The URL of the OpenAI status API.
pub(crate) const HEALTH_URL: &str = "https://status.openai.com/api/v2/status.json";
/// The expected status indicator for a healthy API.
const HEALTH_OK: &str = "none";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: StatusInfo,
}

#[derive(Debug, Deserialize)]
struct StatusInfo {
    /// The status indicator (e.g., "none", "minor", "major", ...).
    indicator: String,
    description: String,
}

/// Returns `200` when the status page reports no incident and `503`
/// otherwise. Transport and parsing errors are returned as is.
pub(crate) async fn check_api_health(url: &str) -> AnyResult<StatusCode> {
    let response: ApiResponse = Client::new()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if response.status.indicator != HEALTH_OK {
        log::warn!("OpenAI reports '{}'", response.status.description);

        return Ok(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(StatusCode::OK)
}
