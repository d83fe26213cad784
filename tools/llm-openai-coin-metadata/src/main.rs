#![doc = include_str!("../README.md")]

use blogcoin_toolkit::{bind_addr, bootstrap};

mod error;
mod generate_coin;
mod generate_image;
mod openai;
mod status;

/// Port the tools listen on unless `BLOGCOIN_BIND_ADDR` says otherwise.
const DEFAULT_PORT: u16 = 8081;

#[tokio::main]
async fn main() {
    bootstrap!(
        bind_addr(DEFAULT_PORT),
        [generate_coin::GenerateCoin, generate_image::GenerateImage]
    )
}
