use {
    crate::domain::SpenderRegistry,
    std::{path::PathBuf, time::Duration},
    url::Url,
};

pub mod file;

/// Settings of the airdrop CLI that rarely change between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the form inputs are saved.
    pub storage: PathBuf,
    /// How long to wait for a submitted transaction to be included.
    pub confirmation_timeout: Duration,
    pub receipt_poll_interval: Duration,
    /// Transaction hashes are appended to this URL to link to them.
    pub explorer: Url,
    /// Forget the form inputs after a completed airdrop.
    pub clear_on_success: bool,
    pub spenders: SpenderRegistry,
}

impl Default for Config {
    fn default() -> Self {
        file::Config::default().into()
    }
}
