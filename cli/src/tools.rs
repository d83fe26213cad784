use crate::{client::ToolClient, command_title, display::json_output, item, prelude::*};

/// Every tool the CLI drives, by the service it lives on.
const TOOLS: [(&str, Service); 7] = [
    ("generate-coin", Service::Metadata),
    ("generate-image", Service::Metadata),
    ("upload-to-ipfs", Service::Pinning),
    ("blog", Service::Pinning),
    ("prepare-coin", Service::Coins),
    ("mint-coin", Service::Coins),
    ("coin-status", Service::Coins),
];

#[derive(Clone, Copy, Debug)]
enum Service {
    Metadata,
    Pinning,
    Coins,
}

impl Service {
    fn url(self, conf: &ToolsConf) -> &str {
        match self {
            Service::Metadata => &conf.metadata_url,
            Service::Pinning => &conf.pinning_url,
            Service::Coins => &conf.coins_url,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum ToolsCommand {
    #[command(about = "Check the health of every configured tool")]
    Health {
        /// Hidden argument used for testing to set the path of the
        /// configuration file.
        #[arg(
            long = "conf-path",
            hide = true,
            default_value = CLI_CONF_PATH,
            value_parser = ValueParser::from(expand_tilde)
        )]
        conf_path: PathBuf,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ToolHealth {
    pub(crate) tool: &'static str,
    pub(crate) url: String,
    /// HTTP status of `/health`, missing when the tool is unreachable.
    pub(crate) status: Option<u16>,
}

impl ToolHealth {
    pub(crate) fn is_healthy(&self) -> bool {
        self.status == Some(200)
    }
}

/// Handle the provided tools command. The [ToolsCommand] instance is passed
/// from [crate::main].
pub(crate) async fn handle(command: ToolsCommand) -> AnyResult<(), BlogcoinCliError> {
    match command {
        // == `$ blogcoin tools health` ==
        ToolsCommand::Health { conf_path } => {
            let report = health(conf_path).await?;

            if report.iter().all(ToolHealth::is_healthy) {
                Ok(())
            } else {
                Err(BlogcoinCliError::Any(anyhow!("Some tools are unhealthy")))
            }
        }
    }
}

/// Ping `/health` of every tool.
async fn health(conf_path: PathBuf) -> AnyResult<Vec<ToolHealth>, BlogcoinCliError> {
    let conf = CliConf::load_from_path_or_default(&conf_path)
        .await
        .map_err(BlogcoinCliError::Any)?;

    command_title!("Checking BlogCoin tools");

    let client = ToolClient::new();
    let mut report = Vec::with_capacity(TOOLS.len());

    for (tool, service) in TOOLS {
        let url = service.url(&conf.tools).to_string();

        let status = match client.health(&url, tool).await {
            Ok(status) => Some(status.as_u16()),
            Err(e) => {
                log::debug!("'{tool}' is unreachable: {e}");

                None
            }
        };

        let health = ToolHealth { tool, url, status };

        match health.status {
            Some(200) => item!("{tool} {}", "healthy".green()),
            Some(status) => item!("{tool} {}", format!("unhealthy ({status})").red()),
            None => item!("{tool} {}", format!("unreachable at {}", health.url).red()),
        }

        report.push(health);
    }

    json_output(&report)?;

    Ok(report)
}
