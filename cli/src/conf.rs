use crate::{command_title, display::json_output, loading, prelude::*};

#[derive(Args, Clone, Debug)]
pub(crate) struct ConfCommand {
    #[arg(
        long = "tools.metadata-url",
        help = "Set the URL of the coin metadata tools",
        value_name = "URL"
    )]
    tools_metadata_url: Option<Url>,
    #[arg(
        long = "tools.pinning-url",
        help = "Set the URL of the IPFS pinning tools",
        value_name = "URL"
    )]
    tools_pinning_url: Option<Url>,
    #[arg(
        long = "tools.coins-url",
        help = "Set the URL of the coin minting tools",
        value_name = "URL"
    )]
    tools_coins_url: Option<Url>,
    #[arg(
        long = "wallet.account",
        help = "Set the wallet account paying for coin creation",
        value_name = "ADDR",
        value_parser = ValueParser::from(|s: &str| s.parse::<EvmAddress>())
    )]
    wallet_account: Option<EvmAddress>,
    #[arg(
        long = "wallet.session",
        help = "Set the wallet session token the coin factory signs with",
        value_name = "TOKEN"
    )]
    wallet_session: Option<String>,
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

/// Handle the provided conf command. The [ConfCommand] instance is passed from
/// [crate::main].
pub(crate) async fn handle(
    ConfCommand {
        tools_metadata_url,
        tools_pinning_url,
        tools_coins_url,
        wallet_account,
        wallet_session,
        conf_path,
    }: ConfCommand,
) -> AnyResult<CliConf, BlogcoinCliError> {
    let mut conf = CliConf::load_from_path_or_default(&conf_path)
        .await
        .map_err(BlogcoinCliError::Any)?;

    // If all fields are None, we just want to display the current configuration.
    if tools_metadata_url.is_none()
        && tools_pinning_url.is_none()
        && tools_coins_url.is_none()
        && wallet_account.is_none()
        && wallet_session.is_none()
    {
        command_title!("Current BlogCoin CLI Configuration");

        if !JSON_MODE.load(Ordering::Relaxed) {
            println!("{:#?}", conf);
        }

        json_output(&conf)?;

        return Ok(conf);
    }

    command_title!("Updating BlogCoin CLI Configuration");

    let conf_handle = loading!("Updating configuration...");

    if let Some(url) = tools_metadata_url {
        conf.tools.metadata_url = url.to_string();
    }

    if let Some(url) = tools_pinning_url {
        conf.tools.pinning_url = url.to_string();
    }

    if let Some(url) = tools_coins_url {
        conf.tools.coins_url = url.to_string();
    }

    conf.wallet.account = wallet_account.or(conf.wallet.account);
    conf.wallet.session = wallet_session.map(Secret::new).or(conf.wallet.session);

    match conf.save(&conf_path).await {
        Ok(()) => {
            conf_handle.success();

            json_output(&conf)?;

            Ok(conf)
        }
        Err(e) => {
            conf_handle.error();

            Err(BlogcoinCliError::Any(e))
        }
    }
}
