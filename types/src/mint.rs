use {
    crate::EvmAddress,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

/// Outcome of a successful coin creation submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MintResult {
    /// Hash of the coin creation transaction.
    pub tx_hash: String,
    pub coin_address: CoinAddress,
}

/// Address of the deployed coin contract. Only known once the creation
/// transaction is confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CoinAddress {
    Pending,
    Confirmed { address: EvmAddress },
}

impl CoinAddress {
    pub fn from_option(address: Option<EvmAddress>) -> Self {
        match address {
            Some(address) => CoinAddress::Confirmed { address },
            None => CoinAddress::Pending,
        }
    }

    pub fn address(&self) -> Option<&EvmAddress> {
        match self {
            CoinAddress::Confirmed { address } => Some(address),
            CoinAddress::Pending => None,
        }
    }
}

/// State of a coin creation transaction as reported by the coin factory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoinStatus {
    Pending,
    Confirmed {
        address: EvmAddress,
    },
    Failed {
        #[serde(default)]
        reason: String,
    },
}

/// Known categories of minting failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MintFailureKind {
    InsufficientFunds,
    Rejected,
    UserDenied,
    Other,
}

/// A minting failure with a message fit to show to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MintFailure {
    pub kind: MintFailureKind,
    /// User facing message.
    pub message: String,
    /// The error exactly as reported by the coin factory or the transport.
    pub raw: String,
}

impl MintFailure {
    /// Classify a raw error message. Matching is a case-insensitive substring
    /// search, checked in order: insufficient funds, rejected, user denied.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lower = raw.to_lowercase();

        let (kind, message) = if lower.contains("insufficient funds") {
            (
                MintFailureKind::InsufficientFunds,
                "Your wallet has insufficient funds to mint the coin".to_string(),
            )
        } else if lower.contains("rejected") {
            (
                MintFailureKind::Rejected,
                "Transaction was rejected by your wallet".to_string(),
            )
        } else if lower.contains("user denied") {
            (
                MintFailureKind::UserDenied,
                "You declined to sign the transaction".to_string(),
            )
        } else {
            let detail = if raw.trim().is_empty() {
                "Unknown error"
            } else {
                raw.as_str()
            };

            (
                MintFailureKind::Other,
                format!("Failed to mint coin: {detail}"),
            )
        };

        Self { kind, message, raw }
    }
}

impl std::fmt::Display for MintFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MintFailure {}
