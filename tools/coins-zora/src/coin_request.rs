//! Coin description shared by the `prepare-coin` and `mint-coin` inputs.

use {
    crate::error::CoinsError,
    blogcoin_types::{CoinDraft, CoinSymbol},
    schemars::JsonSchema,
    serde::Deserialize,
};

#[derive(Clone, Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct CoinRequest {
    /// Name of the coin.
    pub name: String,
    /// Description of the coin.
    pub description: String,
    /// URI of the pinned blog post.
    pub content_uri: String,
    /// URI of the coin icon.
    #[serde(default)]
    pub image_uri: Option<String>,
    /// Address receiving the creator rewards.
    pub recipient_address: String,
    /// Symbol to use instead of the one derived from the name.
    #[serde(default)]
    pub symbol: Option<String>,
}

impl TryFrom<CoinRequest> for CoinDraft {
    type Error = CoinsError;

    fn try_from(request: CoinRequest) -> Result<Self, Self::Error> {
        let CoinRequest {
            name,
            description,
            content_uri,
            image_uri,
            recipient_address,
            symbol,
        } = request;

        if [&name, &description, &content_uri, &recipient_address]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(CoinsError::Validation(
                "Missing required fields: name, description, content_uri, or recipient_address"
                    .to_string(),
            ));
        }

        let symbol = symbol
            .filter(|symbol| !symbol.trim().is_empty())
            .map(|symbol| CoinSymbol::parse(&symbol))
            .transpose()?;

        Ok(CoinDraft {
            name,
            description,
            content_uri,
            image_uri: image_uri.filter(|uri| !uri.trim().is_empty()),
            recipient: recipient_address.parse()?,
            symbol,
        })
    }
}
