//! # `mint-coin`
//!
//! Tool that builds the coin parameters and submits the coin creation to the
//! coin factory on behalf of a wallet.
//!
//! Failures of the submission are classified so the caller can show the user
//! what went wrong, see [`MintFailure::classify`].

use {
    crate::{
        coin_request::CoinRequest,
        error::{CoinsError, CoinsErrorKind},
        factory::FactoryClient,
    },
    blogcoin_toolkit::*,
    blogcoin_types::{CoinAddress, CoinDraft, CoinParams, MintFailure, MintResult, WalletHandle},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

// `deny_unknown_fields` does not combine with `flatten`.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct Input {
    #[serde(flatten)]
    coin: CoinRequest,
    /// Wallet signing the creation transaction.
    wallet: WalletHandle,
}

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        #[serde(flatten)]
        result: MintResult,
        /// Parameters the coin was created with.
        coin_params: CoinParams,
    },
    Err {
        /// Detailed error message.
        reason: String,
        /// Type of error.
        kind: CoinsErrorKind,
        /// Classified minting failure, when the submission itself failed.
        #[serde(skip_serializing_if = "Option::is_none")]
        failure: Option<MintFailure>,
        /// HTTP status code returned by the coin factory, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

pub(crate) struct MintCoin {
    factory: FactoryClient,
}

impl BlogcoinTool for MintCoin {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            factory: FactoryClient::from_env(),
        }
    }

    fn name() -> &'static str {
        "mint-coin"
    }

    fn path() -> &'static str {
        "/mint-coin"
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

    async fn invoke(&self, input: Self::Input) -> Self::Output {
        match self.mint(input).await {
            Ok((result, coin_params)) => Output::Ok {
                result,
                coin_params,
            },
            Err(e) => {
                log::error!("Failed to mint coin: {e}");

                Output::Err {
                    reason: e.to_string(),
                    kind: e.kind(),
                    status_code: e.status_code(),
                    failure: e.into_failure(),
                }
            }
        }
    }
}

impl MintCoin {
    /// Any error on the way to a transaction hash is a minting failure.
    async fn mint(
        &self,
        Input { coin, wallet }: Input,
    ) -> Result<(MintResult, CoinParams), CoinsError> {
        let params = CoinParams::new(CoinDraft::try_from(coin)?);

        let response = self
            .factory
            .create_coin(&params, &wallet)
            .await
            .map_err(|e| CoinsError::Mint {
                status_code: e.status_code(),
                failure: e.into(),
            })?;

        log::info!(
            "Submitted coin '{}' ({}) in transaction {}",
            params.name,
            params.symbol,
            response.hash
        );

        let result = MintResult {
            tx_hash: response.hash,
            coin_address: CoinAddress::from_option(response.address),
        };

        Ok((result, params))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        assert_matches::assert_matches,
        blogcoin_types::{MintFailureKind, Network},
        mockito::{Matcher, Server},
        serde_json::json,
    };

    const ACCOUNT: &str = "0x1234567890abcdef1234567890abcdef12345678";
    const COIN: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";

    impl MintCoin {
        fn with_factory_url(factory_url: &str) -> Self {
            Self {
                factory: FactoryClient::new(factory_url, Network::Base, None),
            }
        }
    }

    async fn create_server_and_tool() -> (mockito::ServerGuard, MintCoin) {
        let server = Server::new_async().await;
        let tool = MintCoin::with_factory_url(&server.url());

        (server, tool)
    }

    fn input() -> Input {
        serde_json::from_value(json!({
            "name": "WhaleCoin",
            "description": "A coin about whale songs.",
            "content_uri": "ipfs://QmPost",
            "image_uri": "ipfs://QmImage",
            "recipient_address": ACCOUNT,
            "wallet": { "account": ACCOUNT, "session": "sess_abc" }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_mint_confirmed() {
        let (mut server, tool) = create_server_and_tool().await;

        let mock = server
            .mock("POST", "/v1/coins")
            .match_body(Matcher::PartialJson(json!({
                "params": { "symbol": "WHALE", "initialPurchaseWei": 0 },
                "chainId": 8453
            })))
            .with_body(json!({ "hash": "0xtx", "address": COIN }).to_string())
            .create_async()
            .await;

        let Output::Ok {
            result,
            coin_params,
        } = tool.invoke(input()).await
        else {
            panic!("Expected a minted coin");
        };

        assert_eq!(result.tx_hash, "0xtx");
        assert_eq!(
            result.coin_address.address().map(|a| a.as_str()),
            Some(COIN)
        );
        assert_eq!(coin_params.uri, "ipfs://QmImage");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_mint_pending_address() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/coins")
            .with_body(json!({ "hash": "0xtx" }).to_string())
            .create_async()
            .await;

        let output = tool.invoke(input()).await;

        assert_matches!(
            &output,
            Output::Ok { result: MintResult { coin_address: CoinAddress::Pending, .. }, .. }
        );

        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["ok"]["tx_hash"], "0xtx");
        assert_eq!(json["ok"]["coin_address"], json!({ "state": "pending" }));
    }

    #[tokio::test]
    async fn test_insufficient_funds() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/coins")
            .with_status(400)
            .with_body(
                json!({ "error": "execution reverted: insufficient funds for gas * price + value" })
                    .to_string(),
            )
            .create_async()
            .await;

        let output = tool.invoke(input()).await;

        assert_matches!(
            &output,
            Output::Err {
                reason,
                kind: CoinsErrorKind::Mint,
                failure: Some(MintFailure { kind: MintFailureKind::InsufficientFunds, .. }),
                status_code: Some(400),
            } if reason == "Your wallet has insufficient funds to mint the coin"
        );
        assert_eq!(MintCoin::status_of(&output), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_user_denied() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/coins")
            .with_status(403)
            .with_body(json!({ "error": "User denied transaction signature." }).to_string())
            .create_async()
            .await;

        assert_matches!(
            tool.invoke(input()).await,
            Output::Err {
                failure: Some(MintFailure { kind: MintFailureKind::UserDenied, .. }),
                ..
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_failure_passes_through() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/coins")
            .with_status(500)
            .with_body("nonce too low")
            .create_async()
            .await;

        let output = tool.invoke(input()).await;

        assert_matches!(
            &output,
            Output::Err { reason, failure: Some(MintFailure { kind: MintFailureKind::Other, .. }), .. }
                if reason == "Failed to mint coin: nonce too low"
        );
    }

    #[tokio::test]
    async fn test_invalid_recipient() {
        let (_server, tool) = create_server_and_tool().await;

        let input = serde_json::from_value(json!({
            "name": "WhaleCoin",
            "description": "A coin about whale songs.",
            "content_uri": "ipfs://QmPost",
            "recipient_address": "vitalik.eth",
            "wallet": { "account": ACCOUNT, "session": "sess_abc" }
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        assert_matches!(
            &output,
            Output::Err { kind: CoinsErrorKind::Validation, failure: None, .. }
        );
        assert_eq!(MintCoin::status_of(&output), StatusCode::BAD_REQUEST);
    }
}
