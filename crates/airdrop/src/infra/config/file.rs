use {
    crate::{domain::SpenderRegistry, infra::config},
    alloy::primitives::Address,
    anyhow::{Context, Result},
    contracts::alloy::TSender,
    serde::Deserialize,
    std::{
        path::{Path, PathBuf},
        time::Duration,
    },
    tokio::fs,
    url::Url,
};

/// Load the configuration from a TOML file.
pub async fn load(path: &Path) -> Result<config::Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    parse(&data).with_context(|| format!("invalid configuration in {path:?}"))
}

pub fn parse(data: &str) -> Result<config::Config> {
    let config: Config = toml::de::from_str(data)?;
    Ok(config.into())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub(super) struct Config {
    /// Path of the file the form inputs are saved in.
    storage: PathBuf,

    #[serde(with = "humantime_serde")]
    confirmation_timeout: Duration,

    /// How often to ask the node whether a transaction was included.
    #[serde(with = "humantime_serde")]
    receipt_poll_interval: Duration,

    explorer: Url,

    clear_on_success: bool,

    /// Overrides of the known spender contract deployments.
    #[serde(rename = "spender")]
    spenders: Vec<SpenderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: PathBuf::from("airdrop-form.json"),
            confirmation_timeout: Duration::from_secs(10 * 60),
            receipt_poll_interval: Duration::from_secs(2),
            explorer: default_explorer(),
            clear_on_success: false,
            spenders: Vec::new(),
        }
    }
}

fn default_explorer() -> Url {
    "https://etherscan.io/tx/".parse().unwrap()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SpenderConfig {
    chain_id: u64,
    /// Without an address the chain has no usable spender contract.
    address: Option<Address>,
}

impl From<Config> for config::Config {
    fn from(config: Config) -> Self {
        let spenders = config.spenders.into_iter().fold(
            SpenderRegistry::new(TSender::DEPLOYMENT_INFO.clone()),
            |registry, spender| registry.with_spender(spender.chain_id, spender.address),
        );

        Self {
            storage: config.storage,
            confirmation_timeout: config.confirmation_timeout,
            receipt_poll_interval: config.receipt_poll_interval,
            explorer: with_trailing_slash(config.explorer),
            clear_on_success: config.clear_on_success,
            spenders,
        }
    }
}

/// Transaction hashes are joined onto the explorer URL, which replaces the
/// last path segment unless the path ends with a `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
