use thiserror::Error;

/// Reasons a user supplied value is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidValue {
    #[error("Invalid address format '{0}': expected 0x followed by 40 hex characters")]
    Address(String),
    #[error("Invalid token symbol '{0}': expected 3 to 5 letters or digits")]
    Symbol(String),
    #[error("Unknown network '{0}': expected 'base' or 'base-sepolia'")]
    Network(String),
}
