use {
    crate::{client::ToolClient, command_title, display::json_output, item, loading, prelude::*},
    blogcoin_types::CoinStatus,
};

#[derive(Args, Clone, Debug)]
pub(crate) struct StatusCommand {
    #[arg(help = "Hash of the coin creation transaction", value_name = "TX_HASH")]
    tx_hash: String,
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct StatusReport {
    pub(crate) tx_hash: String,
    #[serde(flatten)]
    pub(crate) status: CoinStatus,
}

/// Look up a coin creation transaction once.
pub(crate) async fn status(
    StatusCommand { tx_hash, conf_path }: StatusCommand,
) -> AnyResult<StatusReport, BlogcoinCliError> {
    let conf = CliConf::load_from_path_or_default(&conf_path)
        .await
        .map_err(BlogcoinCliError::Any)?;

    command_title!("Looking up transaction '{tx_hash}'");

    let handle = loading!("Asking the coin factory...");

    let report = match ToolClient::new()
        .invoke_ok::<_, StatusReport>(
            &conf.tools.coins_url,
            "coin-status",
            &serde_json::json!({ "tx_hash": tx_hash }),
        )
        .await
    {
        Ok(report) => {
            handle.success();

            report
        }
        Err(e) => {
            handle.error();

            return Err(e);
        }
    };

    match &report.status {
        CoinStatus::Pending => item!("Status: {}", "pending".yellow()),
        CoinStatus::Confirmed { address } => {
            item!("Status: {}", "confirmed".green());
            item!("Coin address: {address}");
        }
        CoinStatus::Failed { reason } => {
            item!("Status: {}", "failed".red());
            item!("Reason: {reason}");
        }
    }

    json_output(&report)?;

    Ok(report)
}
