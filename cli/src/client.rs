//! Calls into the BlogCoin tool services.
//!
//! Every tool answers `POST <tool>/invoke` with either `{"ok": {..}}` or
//! `{"err": {"reason", "kind", ..}}`, and malformed input with a `422` and an
//! `{"error", "details"}` body.

use {
    crate::prelude::*,
    blogcoin_types::MintFailure,
    serde::de::DeserializeOwned,
};

/// The `err` variant every tool shares.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ToolErr {
    pub(crate) reason: String,
    #[serde(default)]
    pub(crate) kind: Option<String>,
    /// Only sent by `mint-coin`.
    #[serde(default)]
    pub(crate) failure: Option<MintFailure>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ToolReply<T> {
    Ok(T),
    Err(ToolErr),
}

/// Body of the runtime's own error replies.
#[derive(Clone, Debug, Deserialize)]
struct RuntimeError {
    error: String,
    details: String,
}

pub(crate) struct ToolClient {
    client: reqwest::Client,
}

impl ToolClient {
    pub(crate) fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Invokes the tool at `<base_url>/<tool>/invoke`. Tool errors are kept
    /// apart from transport errors so callers can inspect them.
    pub(crate) async fn invoke<I: Serialize, O: DeserializeOwned>(
        &self,
        base_url: &str,
        tool: &'static str,
        input: &I,
    ) -> AnyResult<Result<O, ToolErr>, BlogcoinCliError> {
        let url = tool_url(base_url, tool, "invoke")?;

        log::debug!("Invoking '{tool}' at {url}");

        let response = self
            .client
            .post(url)
            .json(input)
            .send()
            .await
            .map_err(BlogcoinCliError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(BlogcoinCliError::Http)?;

        if let Ok(reply) = serde_json::from_str::<ToolReply<O>>(&body) {
            return Ok(match reply {
                ToolReply::Ok(output) => Ok(output),
                ToolReply::Err(err) => Err(err),
            });
        }

        let reason = match serde_json::from_str::<RuntimeError>(&body) {
            Ok(RuntimeError { error, details }) => format!("{status}: {error}: {details}"),
            Err(e) => format!("{status}: unexpected response ({e}): {body}"),
        };

        Err(BlogcoinCliError::Tool { tool, reason })
    }

    /// Invokes a tool and turns its `err` variant into an error.
    pub(crate) async fn invoke_ok<I: Serialize, O: DeserializeOwned>(
        &self,
        base_url: &str,
        tool: &'static str,
        input: &I,
    ) -> AnyResult<O, BlogcoinCliError> {
        self.invoke(base_url, tool, input)
            .await?
            .map_err(|err| BlogcoinCliError::Tool {
                tool,
                reason: match err.kind {
                    Some(kind) => format!("{} ({kind})", err.reason),
                    None => err.reason,
                },
            })
    }

    /// Status code of `GET <base_url>/<tool>/health`.
    pub(crate) async fn health(
        &self,
        base_url: &str,
        tool: &'static str,
    ) -> AnyResult<reqwest::StatusCode, BlogcoinCliError> {
        let url = tool_url(base_url, tool, "health")?;

        self.client
            .get(url)
            .send()
            .await
            .map(|response| response.status())
            .map_err(BlogcoinCliError::Http)
    }
}

/// Tools live below the configured base URL, which may carry a path.
fn tool_url(base_url: &str, tool: &str, endpoint: &str) -> AnyResult<Url, BlogcoinCliError> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).map_err(|e| {
        BlogcoinCliError::Any(anyhow!("Invalid tool service URL '{base_url}': {e}"))
    })?;

    base.join(&format!("{tool}/{endpoint}"))
        .map_err(|e| BlogcoinCliError::Any(anyhow!("Invalid tool path '{tool}': {e}")))
}
