use {
    crate::InvalidValue,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumString},
};

/// Chains a coin can be created on.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Network {
    #[default]
    Base,
    BaseSepolia,
}

impl Network {
    /// Parse a network name, `base` or `base-sepolia`.
    pub fn parse(s: &str) -> Result<Self, InvalidValue> {
        s.trim()
            .parse::<Network>()
            .map_err(|_| InvalidValue::Network(s.to_string()))
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Base => 8453,
            Network::BaseSepolia => 84532,
        }
    }

    /// Public RPC endpoint used when none is configured.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Base => "https://mainnet.base.org",
            Network::BaseSepolia => "https://sepolia.base.org",
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn test_network_parse() {
        assert_eq!(Network::parse("base"), Ok(Network::Base));
        assert_eq!(Network::parse("Base-Sepolia"), Ok(Network::BaseSepolia));
        assert_matches!(Network::parse("mainnet"), Err(InvalidValue::Network(_)));
    }

    #[test]
    fn test_network_details() {
        assert_eq!(Network::default(), Network::Base);
        assert_eq!(Network::Base.chain_id(), 8453);
        assert_eq!(Network::BaseSepolia.chain_id(), 84532);
        assert_eq!(Network::BaseSepolia.to_string(), "base-sepolia");
        assert_eq!(
            serde_json::to_string(&Network::BaseSepolia).unwrap(),
            r#""base-sepolia""#
        );
    }
}
