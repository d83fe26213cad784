//! # BlogCoin Toolkit
//!
//! The BlogCoin Toolkit is a Rust library that provides a trait to define a
//! BlogCoin tool. A tool is a small service that can be invoked over HTTP and
//! usually forwards its input to a third-party API. The Toolkit generates the
//! necessary endpoints for the tool and serves them.

mod blogcoin_tool;
mod env;
mod runtime;

pub use {
    anyhow::Result as AnyResult,
    blogcoin_tool::BlogcoinTool,
    env::{bind_addr, init_logging, optional_env, required_env, BIND_ADDR_ENV},
    runtime::routes_for_,
    warp::{self, http::StatusCode},
};

#[doc(hidden)]
pub use log;
