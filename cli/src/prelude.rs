pub(crate) use {
    crate::error::BlogcoinCliError,
    anyhow::{anyhow, Result as AnyResult},
    blogcoin_types::{EvmAddress, Secret, WalletHandle},
    clap::{builder::ValueParser, Args, Parser, Subcommand},
    colored::Colorize,
    reqwest::Url,
    serde::{Deserialize, Serialize},
    std::{
        path::PathBuf,
        sync::atomic::{AtomicBool, Ordering},
    },
};

// Where to find config file.
pub(crate) const CLI_CONF_PATH: &str = "~/.blogcoin/conf.toml";

/// When set, commands print a single JSON document instead of decorated
/// text.
pub(crate) static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Struct holding the config structure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CliConf {
    #[serde(default)]
    pub(crate) tools: ToolsConf,
    #[serde(default)]
    pub(crate) wallet: WalletConf,
}

impl CliConf {
    pub(crate) async fn load_from_path(path: &PathBuf) -> AnyResult<Self> {
        let conf = tokio::fs::read_to_string(path).await?;

        Ok(toml::from_str(&conf)?)
    }

    pub(crate) async fn load_from_path_or_default(path: &PathBuf) -> AnyResult<Self> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }

        Self::load_from_path(path).await
    }

    pub(crate) async fn save(&self, path: &PathBuf) -> AnyResult<()> {
        let parent_folder = path
            .parent()
            .ok_or_else(|| anyhow!("'{}' has no parent folder", path.display()))?;
        let conf = toml::to_string_pretty(&self)?;

        tokio::fs::create_dir_all(parent_folder).await?;
        tokio::fs::write(path, conf).await?;

        Ok(())
    }
}

/// Base URLs of the tool services.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ToolsConf {
    #[serde(default = "default_metadata_url")]
    pub(crate) metadata_url: String,
    #[serde(default = "default_pinning_url")]
    pub(crate) pinning_url: String,
    #[serde(default = "default_coins_url")]
    pub(crate) coins_url: String,
}

impl Default for ToolsConf {
    fn default() -> Self {
        Self {
            metadata_url: default_metadata_url(),
            pinning_url: default_pinning_url(),
            coins_url: default_coins_url(),
        }
    }
}

/// The wallet coins are minted with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct WalletConf {
    pub(crate) account: Option<EvmAddress>,
    pub(crate) session: Option<Secret<String>>,
}

impl WalletConf {
    /// Both halves of the wallet are needed to mint.
    pub(crate) fn handle(&self) -> Option<WalletHandle> {
        Some(WalletHandle {
            account: self.account.clone()?,
            session: self.session.clone()?,
        })
    }
}

// == Used by clap ==

/// Expands `~/` to the user's home directory in path arguments.
pub(crate) fn expand_tilde(path: &str) -> AnyResult<PathBuf> {
    if let Some(path) = path.strip_prefix("~/") {
        match home::home_dir() {
            Some(home) => return Ok(home.join(path)),
            None => return Err(anyhow!("Could not find home directory")),
        }
    }

    Ok(path.into())
}

// == Used by serde ==

fn default_metadata_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_pinning_url() -> String {
    "http://127.0.0.1:8082".to_string()
}

fn default_coins_url() -> String {
    "http://127.0.0.1:8083".to_string()
}
