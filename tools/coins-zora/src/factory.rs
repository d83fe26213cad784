//! Client for the coin-creation service
//!
//! The service owns the signing and submission of creation transactions. It
//! takes the coin parameters together with a wallet session and answers with
//! the transaction hash, plus the coin address when it is already known.

use {
    crate::error::FactoryError,
    blogcoin_toolkit::{optional_env, required_env, AnyResult, StatusCode},
    blogcoin_types::{CoinParams, CoinStatus, EvmAddress, Network, WalletHandle},
    reqwest::{Client, Response, Url},
    serde::{Deserialize, Serialize},
};

pub(crate) const NETWORK_ENV: &str = "BLOGCOIN_NETWORK";
pub(crate) const FACTORY_URL_ENV: &str = "BLOGCOIN_COIN_FACTORY_URL";
pub(crate) const RPC_URL_ENV: &str = "BLOGCOIN_RPC_URL";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCoinRequest<'a> {
    params: &'a CoinParams,
    chain_id: u64,
    rpc_url: &'a str,
    wallet: &'a WalletHandle,
}

/// Answer to a creation submission.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CreateCoinResponse {
    pub hash: String,
    #[serde(default)]
    pub address: Option<EvmAddress>,
}

pub(crate) struct FactoryClient {
    client: Client,
    base_url: String,
    network: Network,
    rpc_url: String,
}

impl FactoryClient {
    pub(crate) fn new(base_url: impl Into<String>, network: Network, rpc_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            network,
            rpc_url: rpc_url.unwrap_or_else(|| network.default_rpc_url().to_string()),
        }
    }

    /// Reads the network, the factory URL and the optional RPC override. An
    /// unknown network name falls back to the default network.
    pub(crate) fn from_env() -> Self {
        let network = match optional_env(NETWORK_ENV).map(|name| Network::parse(&name)) {
            Some(Ok(network)) => network,
            Some(Err(e)) => {
                log::warn!("{e}, using '{}'", Network::default());

                Network::default()
            }
            None => Network::default(),
        };

        Self::new(required_env(FACTORY_URL_ENV), network, optional_env(RPC_URL_ENV))
    }

    pub(crate) fn network(&self) -> Network {
        self.network
    }

    /// Submits a creation transaction for `params`, signed with `wallet`.
    pub(crate) async fn create_coin(
        &self,
        params: &CoinParams,
        wallet: &WalletHandle,
    ) -> Result<CreateCoinResponse, FactoryError> {
        let body = CreateCoinRequest {
            params,
            chain_id: self.network.chain_id(),
            rpc_url: &self.rpc_url,
            wallet,
        };

        let response = self
            .client
            .post(format!("{}/v1/coins", self.base_url))
            .json(&body)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    /// Looks up the state of a creation transaction once.
    pub(crate) async fn coin_status(&self, tx_hash: &str) -> Result<CoinStatus, FactoryError> {
        let response = self.client.get(self.coin_url(tx_hash)?).send().await?;

        Ok(checked(response).await?.json().await?)
    }

    /// `<base>/v1/coins/<tx_hash>` with the hash escaped as a single segment.
    fn coin_url(&self, tx_hash: &str) -> Result<Url, FactoryError> {
        let invalid = || FactoryError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;

        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["v1", "coins", tx_hash]);

        Ok(url)
    }

    /// `200` when the factory answers on its health route, `503` otherwise.
    pub(crate) async fn health(&self) -> AnyResult<StatusCode> {
        if self.base_url.is_empty() {
            log::warn!("{FACTORY_URL_ENV} is not set");

            return Ok(StatusCode::SERVICE_UNAVAILABLE);
        }

        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(StatusCode::OK),
            Ok(response) => {
                log::warn!("Coin factory health check returned {}", response.status());

                Ok(StatusCode::SERVICE_UNAVAILABLE)
            }
            Err(e) => {
                log::warn!("Coin factory health check failed: {e}");

                Ok(StatusCode::SERVICE_UNAVAILABLE)
            }
        }
    }
}

/// Turns non-2xx answers into [`FactoryError::Api`] carrying the `error`
/// field of the body.
async fn checked(response: Response) -> Result<Response, FactoryError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            }
        });

    Err(FactoryError::Api {
        status: status.as_u16(),
        message,
    })
}
