#![doc = include_str!("../README.md")]

use blogcoin_toolkit::{bind_addr, bootstrap};

mod coin_request;
mod coin_status;
mod error;
mod factory;
mod mint_coin;
mod prepare_coin;

/// Port the tools listen on unless `BLOGCOIN_BIND_ADDR` says otherwise.
const DEFAULT_PORT: u16 = 8083;

#[tokio::main]
async fn main() {
    bootstrap!(
        bind_addr(DEFAULT_PORT),
        [
            prepare_coin::PrepareCoin,
            mint_coin::MintCoin,
            coin_status::CoinStatusTool
        ]
    )
}
