use {
    crate::{display::*, prelude::*},
    blogcoin_types::MintFailure,
    thiserror::Error,
};

/// Custom error definitions for the BlogCoin CLI. Takes care of displaying
/// a pretty summary in the console.
#[derive(Debug, Error)]
pub(crate) enum BlogcoinCliError {
    #[error("{error}{separator}\n{0}", error = "Syntax Error".red().bold(), separator = separator())]
    SyntaxError(clap::error::Error),
    #[error("{error}{separator}\n{0}", error = "IO Error".red().bold(), separator = separator())]
    IoError(std::io::Error),
    #[error("{error}{separator}\n{0}", error = "HTTP Error".red().bold(), separator = separator())]
    Http(reqwest::Error),
    /// A tool answered with its `err` variant or with a malformed body.
    #[error("{error} in '{tool}'{separator}\n{reason}", error = "Tool Error".red().bold(), separator = separator())]
    Tool { tool: &'static str, reason: String },
    #[error("{error}{separator}\n{0}", error = "Minting Error".red().bold(), separator = separator())]
    Mint(MintFailure),
    #[error("{error}{separator}\n{0}", error = "Error".red().bold(), separator = separator())]
    Any(anyhow::Error),
}
