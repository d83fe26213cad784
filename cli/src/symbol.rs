use {
    crate::{display::json_output, prelude::*},
    blogcoin_types::{derive_symbol, CoinSymbol},
};

/// Print the symbol a coin named `name` gets when none is chosen.
pub(crate) fn symbol(name: String) -> AnyResult<CoinSymbol, BlogcoinCliError> {
    let symbol = derive_symbol(&name);

    if JSON_MODE.load(Ordering::Relaxed) {
        json_output(&serde_json::json!({ "name": name, "symbol": symbol }))?;
    } else {
        println!("{symbol}");
    }

    Ok(symbol)
}
