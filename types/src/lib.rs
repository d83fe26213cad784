//! This library contains the BlogCoin types that are shared between the tool
//! services and the CLI, together with the pure data-shaping rules that turn a
//! blog post into the parameters of a coin.

/// EVM account and contract addresses.
mod address;
pub use address::*;

/// Coin symbol derivation and the parameter record sent to the coin factory.
mod coin;
pub use coin::*;

/// Errors produced when parsing user supplied values.
mod error;
pub use error::*;

/// Minting results and the classification of minting failures.
mod mint;
pub use mint::*;

/// Supported chains.
mod network;
pub use network::*;

/// Blog posts and the documents pinned for them.
mod post;
pub use post::*;

mod secret;
pub use secret::Secret;

/// Values that may have been substituted by a fallback.
mod sourced;
pub use sourced::Sourced;

mod wallet;
pub use wallet::WalletHandle;
