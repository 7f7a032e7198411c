use {
    alloy::signers::local::PrivateKeySigner,
    std::path::PathBuf,
    url::Url,
};

#[derive(Debug, clap::Parser)]
#[clap(about = "Send an ERC-20 token to many recipients in a single transaction")]
pub struct Args {
    /// The log filter.
    #[clap(long, env, default_value = "warn,airdrop=debug")]
    pub log: String,

    /// At which log level logs should be printed to stderr instead of stdout.
    #[clap(long, env)]
    pub stderr_threshold: Option<tracing::Level>,

    /// Whether to use JSON format for the logs.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,

    /// The node RPC API endpoint.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the account that signs the transactions.
    /// Without it no wallet is connected.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,

    /// Path to the configuration file in TOML format.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// Keep the form inputs in memory only instead of saving them.
    #[clap(long, env)]
    pub ephemeral: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Set the address of the token to send.
    Token { address: String },
    /// Set the recipients, separated by commas or new lines.
    Recipients { text: String },
    /// Set the amounts in the smallest token unit, separated by commas or new
    /// lines.
    Amounts { text: String },
    /// Show the form inputs and a summary of the transfer.
    Show,
    /// Forget the form inputs.
    Clear,
    /// Approve the spender contract if needed and send the airdrop.
    Send,
}
