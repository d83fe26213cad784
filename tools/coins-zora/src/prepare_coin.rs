//! # `prepare-coin`
//!
//! Tool that validates a coin description and returns the parameters the
//! coin factory expects, for clients that sign the creation themselves.

use {
    crate::{
        coin_request::CoinRequest,
        error::CoinsErrorKind,
        factory::FactoryClient,
    },
    blogcoin_toolkit::*,
    blogcoin_types::{CoinDraft, CoinParams, Network},
    schemars::JsonSchema,
    serde::Serialize,
};

pub(crate) type Input = CoinRequest;

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        /// Parameters of the coin creation.
        coin_params: CoinParams,
        /// Network the coin is created on.
        network: Network,
        /// Chain id of that network.
        chain_id: u64,
    },
    Err {
        /// Detailed error message.
        reason: String,
        /// Type of error.
        kind: CoinsErrorKind,
    },
}

pub(crate) struct PrepareCoin {
    factory: FactoryClient,
}

impl BlogcoinTool for PrepareCoin {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            factory: FactoryClient::from_env(),
        }
    }

    fn name() -> &'static str {
        "prepare-coin"
    }

    fn path() -> &'static str {
        "/prepare-coin"
    }

    fn status_of(output: &Self::Output) -> StatusCode {
        match output {
            Output::Ok { .. } => StatusCode::OK,
            Output::Err { kind, .. } => kind.status(),
        }
    }

    /// Preparing is local, the tool is healthy as long as it runs.
    async fn health(&self) -> AnyResult<StatusCode> {
        Ok(StatusCode::OK)
    }

    async fn invoke(&self, input: Self::Input) -> Self::Output {
        let network = self.factory.network();

        match CoinDraft::try_from(input) {
            Ok(draft) => {
                let coin_params = CoinParams::new(draft);

                log::info!(
                    "Prepared coin '{}' ({}) on {network}",
                    coin_params.name,
                    coin_params.symbol
                );

                Output::Ok {
                    coin_params,
                    network,
                    chain_id: network.chain_id(),
                }
            }
            Err(e) => {
                log::warn!("Rejected coin parameters: {e}");

                Output::Err {
                    reason: e.to_string(),
                    kind: e.kind(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, serde_json::json};

    impl PrepareCoin {
        fn on(network: Network) -> Self {
            Self {
                factory: FactoryClient::new("", network, None),
            }
        }
    }

    #[tokio::test]
    async fn test_prepare() {
        let tool = PrepareCoin::on(Network::BaseSepolia);

        let input = serde_json::from_value(json!({
            "name": "  WhaleCoin ",
            "description": "A coin about whale songs.",
            "content_uri": "ipfs://QmPost",
            "recipient_address": "0x1234567890abcdef1234567890abcdef12345678"
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        let Output::Ok {
            coin_params,
            network,
            chain_id,
        } = output
        else {
            panic!("Expected coin params");
        };

        assert_eq!(coin_params.name, "WhaleCoin");
        assert_eq!(coin_params.symbol.as_str(), "WHALE");
        assert_eq!(coin_params.uri, "");
        assert_eq!(coin_params.animation_uri, "ipfs://QmPost");
        assert_eq!(coin_params.initial_purchase_wei, 0);
        assert_eq!(network, Network::BaseSepolia);
        assert_eq!(chain_id, 84532);
    }

    #[tokio::test]
    async fn test_prepare_rejects_bad_address() {
        let tool = PrepareCoin::on(Network::Base);

        let input = serde_json::from_value(json!({
            "name": "WhaleCoin",
            "description": "A coin about whale songs.",
            "content_uri": "ipfs://QmPost",
            "recipient_address": "0x1234"
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        assert_matches!(
            &output,
            Output::Err { kind: CoinsErrorKind::Validation, reason }
                if reason.starts_with("Invalid address format")
        );
        assert_eq!(PrepareCoin::status_of(&output), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_output_serialization() {
        let output = Output::Err {
            reason: "Missing required fields".to_string(),
            kind: CoinsErrorKind::Validation,
        };

        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({ "err": { "reason": "Missing required fields", "kind": "validation" } })
        );
    }
}
