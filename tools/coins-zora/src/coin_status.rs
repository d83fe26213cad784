//! # `coin-status`
//!
//! Tool that looks up the state of a coin creation transaction once.

use {
    crate::{
        error::{CoinsError, CoinsErrorKind},
        factory::FactoryClient,
    },
    blogcoin_toolkit::*,
    blogcoin_types::CoinStatus,
    lazy_regex::regex_is_match,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct Input {
    /// Hash of the coin creation transaction.
    tx_hash: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        tx_hash: String,
        #[serde(flatten)]
        status: CoinStatus,
    },
    Err {
        /// Detailed error message.
        reason: String,
        /// Type of error.
        kind: CoinsErrorKind,
        /// HTTP status code returned by the coin factory, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

pub(crate) struct CoinStatusTool {
    factory: FactoryClient,
}

impl BlogcoinTool for CoinStatusTool {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            factory: FactoryClient::from_env(),
        }
    }

    fn name() -> &'static str {
        "coin-status"
    }

    fn path() -> &'static str {
        "/coin-status"
    }

    fn status_of(output: &Self::Output) -> StatusCode {
        match output {
            Output::Ok { .. } => StatusCode::OK,
            Output::Err { kind, .. } => kind.status(),
        }
    }

    async fn health(&self) -> AnyResult<StatusCode> {
        self.factory.health().await
    }

    async fn invoke(&self, Self::Input { tx_hash }: Self::Input) -> Self::Output {
        match self.lookup(&tx_hash).await {
            Ok(status) => Output::Ok { tx_hash, status },
            Err(e) => {
                log::error!("Failed to look up transaction {tx_hash}: {e}");

                Output::Err {
                    reason: e.to_string(),
                    kind: e.kind(),
                    status_code: e.status_code(),
                }
            }
        }
    }
}

impl CoinStatusTool {
    async fn lookup(&self, tx_hash: &str) -> Result<CoinStatus, CoinsError> {
        let tx_hash = tx_hash.trim();

        if tx_hash.is_empty() {
            return Err(CoinsError::Validation("Transaction hash is required".to_string()));
        }

        if !regex_is_match!(r"^0x[0-9a-fA-F]{64}$", tx_hash) {
            return Err(CoinsError::Validation(format!(
                "Invalid transaction hash '{tx_hash}', expected 0x followed by 64 hex digits"
            )));
        }

        Ok(self.factory.coin_status(tx_hash).await?)
    }
}
