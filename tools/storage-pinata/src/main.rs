#![doc = include_str!("../README.md")]

use blogcoin_toolkit::{bind_addr, bootstrap};

mod blog;
mod error;
mod pinata;
mod upload_to_ipfs;

/// Port the tools listen on unless `BLOGCOIN_BIND_ADDR` says otherwise.
const DEFAULT_PORT: u16 = 8082;

#[tokio::main]
async fn main() {
    bootstrap!(
        bind_addr(DEFAULT_PORT),
        [upload_to_ipfs::UploadToIpfs, blog::Blog]
    )
}
