//! Process environment helpers shared by all tool binaries.

use std::net::SocketAddr;

/// Environment variable overriding the address a tool binary listens on.
pub const BIND_ADDR_ENV: &str = "BLOGCOIN_BIND_ADDR";

/// Initialise `env_logger`, defaulting to the `info` level when `RUST_LOG` is
/// not set. Calling this more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Returns the address to serve on. Reads [`BIND_ADDR_ENV`] and falls back to
/// `127.0.0.1:<default_port>` when the variable is missing or malformed.
pub fn bind_addr(default_port: u16) -> SocketAddr {
    let default = SocketAddr::from(([127, 0, 0, 1], default_port));

    match optional_env(BIND_ADDR_ENV) {
        Some(value) => value.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring {BIND_ADDR_ENV}='{value}': {e}");

            default
        }),
        None => default,
    }
}

/// Reads a trimmed, non-empty environment variable.
pub fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads an environment variable the tool cannot work without. A missing
/// value is logged and replaced by an empty string so that the tool still
/// starts; the upstream API then rejects the calls and `/health` reports it.
pub fn required_env(name: &str) -> String {
    optional_env(name).unwrap_or_else(|| {
        log::warn!("{name} is not set, calls depending on it will fail");

        String::new()
    })
}

#[cfg(test)]
mod tests {
    use {super::*, serial_test::serial};

    #[test]
    #[serial(bind_addr_env)]
    fn test_bind_addr() {
        std::env::remove_var(BIND_ADDR_ENV);

        assert_eq!(bind_addr(8081), SocketAddr::from(([127, 0, 0, 1], 8081)));

        std::env::set_var(BIND_ADDR_ENV, "0.0.0.0:9000");

        assert_eq!(bind_addr(8081), SocketAddr::from(([0, 0, 0, 0], 9000)));

        std::env::set_var(BIND_ADDR_ENV, "not an address");

        assert_eq!(bind_addr(8081), SocketAddr::from(([127, 0, 0, 1], 8081)));

        std::env::remove_var(BIND_ADDR_ENV);
    }

    #[test]
    #[serial(optional_env)]
    fn test_optional_and_required_env() {
        std::env::set_var("BLOGCOIN_TOOLKIT_TEST_VAR", "  value ");

        assert_eq!(
            optional_env("BLOGCOIN_TOOLKIT_TEST_VAR"),
            Some("value".to_string())
        );
        assert_eq!(required_env("BLOGCOIN_TOOLKIT_TEST_VAR"), "value");

        std::env::set_var("BLOGCOIN_TOOLKIT_TEST_VAR", "   ");

        assert_eq!(optional_env("BLOGCOIN_TOOLKIT_TEST_VAR"), None);
        assert_eq!(required_env("BLOGCOIN_TOOLKIT_TEST_VAR"), "");

        std::env::remove_var("BLOGCOIN_TOOLKIT_TEST_VAR");
    }
}
