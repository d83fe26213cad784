use {
    crate::{
        client::ToolClient,
        command_title,
        display::json_output,
        item,
        loading,
        notify_success,
        notify_warning,
        prelude::*,
    },
    blogcoin_types::{CoinAddress, CoinParams, CoinSymbol, CoinText, MintResult, Sourced},
};

#[derive(Args, Clone, Debug)]
pub(crate) struct PublishCommand {
    #[arg(
        long = "file",
        short = 'f',
        help = "Path to the blog post",
        value_name = "PATH",
        value_parser = ValueParser::from(expand_tilde)
    )]
    file: PathBuf,
    #[arg(
        long = "symbol",
        short = 's',
        help = "Token symbol, 3 to 5 letters or digits. Derived from the coin name if missing",
        value_name = "SYM",
        value_parser = ValueParser::from(CoinSymbol::parse)
    )]
    symbol: Option<CoinSymbol>,
    #[arg(
        long = "recipient",
        short = 'r',
        help = "Address receiving the creator rewards. Defaults to the wallet account",
        value_name = "ADDR",
        value_parser = ValueParser::from(|s: &str| s.parse::<EvmAddress>())
    )]
    recipient: Option<EvmAddress>,
    /// Hidden argument used for testing to set the path of the configuration
    /// file.
    #[arg(
        long = "conf-path",
        hide = true,
        default_value = CLI_CONF_PATH,
        value_parser = ValueParser::from(expand_tilde)
    )]
    conf_path: PathBuf,
}

// == Tool outputs ==

#[derive(Clone, Debug, Deserialize)]
struct GeneratedCoin {
    text: Sourced<CoinText>,
    image_uri: Sourced<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PinnedContent {
    content_uri: String,
    #[serde(default)]
    image_uri: Option<Sourced<String>>,
}

#[derive(Clone, Debug, Deserialize)]
struct MintedCoin {
    #[serde(flatten)]
    result: MintResult,
    coin_params: CoinParams,
}

/// Everything the publish flow produced, printed with `--json`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct Published {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) symbol: CoinSymbol,
    pub(crate) content_uri: String,
    pub(crate) image_uri: Option<String>,
    #[serde(flatten)]
    pub(crate) result: MintResult,
    /// Human readable notes on every value that had to be substituted.
    pub(crate) fallbacks: Vec<String>,
}

/// Publish a blog post as a coin: generate the coin metadata, pin the post and
/// the image, then mint.
pub(crate) async fn publish(command: PublishCommand) -> AnyResult<Published, BlogcoinCliError> {
    let mut fallbacks = vec![];

    publish_noting(command, &mut fallbacks).await
}

/// Warns about a substituted value right away so that the warning is shown
/// even if a later step fails.
fn note_fallback(fallbacks: &mut Vec<String>, note: String) {
    notify_warning!("{note}");

    fallbacks.push(note);
}

/// The publish flow. Every fallback note is pushed to `fallbacks` as soon as
/// it is known.
async fn publish_noting(
    PublishCommand {
        file,
        symbol,
        recipient,
        conf_path,
    }: PublishCommand,
    fallbacks: &mut Vec<String>,
) -> AnyResult<Published, BlogcoinCliError> {
    let conf = CliConf::load_from_path_or_default(&conf_path)
        .await
        .map_err(BlogcoinCliError::Any)?;

    let content = tokio::fs::read_to_string(&file)
        .await
        .map_err(BlogcoinCliError::IoError)?;

    if content.trim().is_empty() {
        return Err(BlogcoinCliError::Any(anyhow!(
            "The blog post at '{}' is empty",
            file.display()
        )));
    }

    let Some(wallet) = conf.wallet.handle() else {
        return Err(BlogcoinCliError::Any(anyhow!(
            "No wallet configured. Set one with `blogcoin conf --wallet.account ADDR --wallet.session TOKEN`"
        )));
    };

    let recipient = recipient.unwrap_or_else(|| wallet.account.clone());
    let client = ToolClient::new();

    command_title!("Publishing '{}' as a coin", file.display());

    // == Coin metadata ==

    let metadata_handle = loading!("Generating coin metadata...");

    let generated = match client
        .invoke_ok::<_, GeneratedCoin>(
            &conf.tools.metadata_url,
            "generate-coin",
            &serde_json::json!({ "content": content }),
        )
        .await
    {
        Ok(generated) => {
            metadata_handle.success();

            generated
        }
        Err(e) => {
            metadata_handle.error();

            return Err(e);
        }
    };

    if let Some(reason) = generated.text.fallback_reason() {
        note_fallback(
            fallbacks,
            format!("Coin name and description are placeholders: {reason}"),
        );
    }

    if let Some(reason) = generated.image_uri.fallback_reason() {
        note_fallback(fallbacks, format!("Coin image is a placeholder: {reason}"));
    }

    let CoinText { name, description } = generated.text.into_value();

    // == Pinning ==

    let pinning_handle = loading!("Pinning the blog post to IPFS...");

    let pinned = match client
        .invoke_ok::<_, PinnedContent>(
            &conf.tools.pinning_url,
            "upload-to-ipfs",
            &serde_json::json!({
                "content": content,
                "image_uri": generated.image_uri.value(),
            }),
        )
        .await
    {
        Ok(pinned) => {
            pinning_handle.success();

            pinned
        }
        Err(e) => {
            pinning_handle.error();

            return Err(e);
        }
    };

    if let Some(reason) = pinned
        .image_uri
        .as_ref()
        .and_then(|image| image.fallback_reason())
    {
        note_fallback(fallbacks, format!("Coin image is not pinned to IPFS: {reason}"));
    }

    let image_uri = pinned.image_uri.map(Sourced::into_value);

    // == Minting ==

    let mint_handle = loading!("Minting the coin...");

    let reply = client
        .invoke::<_, MintedCoin>(
            &conf.tools.coins_url,
            "mint-coin",
            &serde_json::json!({
                "name": name,
                "description": description,
                "content_uri": pinned.content_uri,
                "image_uri": image_uri,
                "recipient_address": recipient,
                "symbol": symbol,
                "wallet": wallet,
            }),
        )
        .await;

    let minted = match reply {
        Ok(Ok(minted)) => {
            mint_handle.success();

            minted
        }
        Ok(Err(err)) => {
            mint_handle.error();

            return Err(match err.failure {
                Some(failure) => BlogcoinCliError::Mint(failure),
                None => BlogcoinCliError::Tool {
                    tool: "mint-coin",
                    reason: err.reason,
                },
            });
        }
        Err(e) => {
            mint_handle.error();

            return Err(e);
        }
    };

    let MintedCoin {
        result,
        coin_params,
    } = minted;

    notify_success!(
        "Coin {name} ({symbol}) submitted in transaction {tx_hash}",
        name = coin_params.name.truecolor(100, 100, 100),
        symbol = coin_params.symbol.as_str().truecolor(100, 100, 100),
        tx_hash = result.tx_hash.truecolor(100, 100, 100)
    );

    match &result.coin_address {
        CoinAddress::Confirmed { address } => item!("Coin address: {address}"),
        CoinAddress::Pending => item!(
            "Coin address is pending, check with `blogcoin status {}`",
            result.tx_hash
        ),
    }

    item!("Content: {}", pinned.content_uri);

    if let Some(image_uri) = &image_uri {
        item!("Image: {image_uri}");
    }

    let published = Published {
        name: coin_params.name,
        description: coin_params.description,
        symbol: coin_params.symbol,
        content_uri: pinned.content_uri,
        image_uri,
        result,
        fallbacks: fallbacks.clone(),
    };

    json_output(&published)?;

    Ok(published)
}
