use {
    crate::{EvmAddress, InvalidValue},
    lazy_regex::{regex, regex_is_match},
    schemars::{JsonSchema, Schema, SchemaGenerator},
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::{borrow::Cow, str::FromStr},
};

/// Symbol used when a name has no alphanumeric characters at all.
pub const FALLBACK_SYMBOL: &str = "BLOG";
/// Shortest allowed symbol.
pub const MIN_SYMBOL_LEN: usize = 3;
/// Longest allowed symbol.
pub const MAX_SYMBOL_LEN: usize = 5;
/// Character appended to symbols that are too short.
const SYMBOL_PAD: char = 'X';

/// A token symbol: 3 to 5 uppercase ASCII letters or digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoinSymbol(String);

impl CoinSymbol {
    /// Parse a symbol typed by a user. The input is uppercased before it is
    /// validated, no characters are dropped.
    pub fn parse(s: &str) -> Result<Self, InvalidValue> {
        let upper = s.trim().to_ascii_uppercase();

        if !regex_is_match!(r"^[A-Z0-9]{3,5}$", &upper) {
            return Err(InvalidValue::Symbol(s.to_string()));
        }

        Ok(Self(upper))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derive a symbol from a coin name.
///
/// Non-alphanumeric characters are removed, the rest is uppercased and
/// truncated to [`MAX_SYMBOL_LEN`]. An empty result becomes
/// [`FALLBACK_SYMBOL`] and anything shorter than [`MIN_SYMBOL_LEN`] is padded
/// with `X` at the end.
///
/// ```
/// use blogcoin_types::derive_symbol;
///
/// assert_eq!(derive_symbol("My Blog!!").as_str(), "MYBLO");
/// assert_eq!(derive_symbol("ab").as_str(), "ABX");
/// ```
pub fn derive_symbol(name: &str) -> CoinSymbol {
    let stripped = regex!(r"[^A-Za-z0-9]").replace_all(name, "");

    let mut symbol = stripped
        .chars()
        .take(MAX_SYMBOL_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect::<String>();

    if symbol.is_empty() {
        return CoinSymbol(FALLBACK_SYMBOL.to_string());
    }

    while symbol.len() < MIN_SYMBOL_LEN {
        symbol.push(SYMBOL_PAD);
    }

    CoinSymbol(symbol)
}

impl FromStr for CoinSymbol {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for CoinSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CoinSymbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CoinSymbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;

        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for CoinSymbol {
    fn schema_name() -> Cow<'static, str> {
        String::schema_name()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Name and description of a coin as proposed by the metadata generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoinText {
    pub name: String,
    pub description: String,
}

/// Metadata describing a coin once its name, description and references are
/// known. This is what the user reviews before minting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoinMetadata {
    pub name: String,
    pub symbol: CoinSymbol,
    pub description: String,
    /// Reference to the coin icon.
    pub image_uri: Option<String>,
    /// Reference to the pinned blog content.
    pub animation_uri: String,
}

impl CoinMetadata {
    /// Build the metadata, deriving the symbol from the name unless one is
    /// given explicitly.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image_uri: Option<String>,
        content_uri: impl Into<String>,
        symbol: Option<CoinSymbol>,
    ) -> Self {
        let name = name.into();
        let symbol = symbol.unwrap_or_else(|| derive_symbol(&name));

        Self {
            name,
            symbol,
            description: description.into(),
            image_uri,
            animation_uri: content_uri.into(),
        }
    }

    /// Turn the metadata into the parameter record for the coin factory,
    /// paying out to `recipient`.
    pub fn into_params(self, recipient: EvmAddress) -> CoinParams {
        CoinParams {
            name: self.name.trim().to_string(),
            symbol: self.symbol,
            description: self.description.trim().to_string(),
            uri: self.image_uri.unwrap_or_default(),
            animation_uri: self.animation_uri,
            payout_recipient: recipient,
            initial_purchase_wei: 0,
        }
    }
}

/// Everything needed to prepare a coin from a blog post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinDraft {
    pub name: String,
    pub description: String,
    pub content_uri: String,
    pub image_uri: Option<String>,
    pub recipient: EvmAddress,
    pub symbol: Option<CoinSymbol>,
}

/// The parameter record handed to the coin factory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoinParams {
    pub name: String,
    pub symbol: CoinSymbol,
    pub description: String,
    /// Coin metadata URI, the generated image. Empty when there is none.
    pub uri: String,
    /// The blog content.
    pub animation_uri: String,
    pub payout_recipient: EvmAddress,
    /// No initial purchase is made when the coin is created.
    pub initial_purchase_wei: u128,
}

impl CoinParams {
    pub fn new(draft: CoinDraft) -> Self {
        let CoinDraft {
            name,
            description,
            content_uri,
            image_uri,
            recipient,
            symbol,
        } = draft;

        CoinMetadata::new(name, description, image_uri, content_uri, symbol).into_params(recipient)
    }
}
