use {
    crate::{
        domain::{
            AllowanceChecker,
            Form,
            Orchestrator,
            Persistence,
            Phase,
            TokenContext,
            TokenMetadataResolver,
            Wallet,
            airdrop::cancellation,
            chain::ChainRead,
        },
        infra::{
            Config,
            Console,
            Ethereum,
            FileStore,
            MemoryStore,
            cli::{self, Command},
            config,
        },
    },
    alloy::signers::local::PrivateKeySigner,
    anyhow::{Context, Result},
    clap::Parser,
    std::sync::Arc,
};

pub async fn start(args: impl Iterator<Item = String>) {
    let args = cli::Args::parse_from(args);
    let obs_config =
        observe::config::Config::new(&args.log, args.stderr_threshold, args.use_json_logs);
    observe::tracing::initialize(&obs_config);
    tracing::debug!(command = ?args.command, ephemeral = args.ephemeral, "running airdrop");

    if let Err(err) = run(args).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(args: cli::Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => config::file::load(path).await?,
        None => Config::default(),
    };
    let store: Arc<dyn Persistence> = if args.ephemeral {
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(FileStore::open(&config.storage)?)
    };
    let mut form = Form::load(store);
    let node = Node {
        url: args.node_url,
        signer: args.private_key,
        config: &config,
    };

    match args.command {
        Command::Token { address } => {
            form.set_token_address(address)?;
            let chain = node
                .try_connect()
                .await
                .map(|eth| eth as Arc<dyn ChainRead>);
            let token = token_context(chain, form.token_address()).await;
            if !token.name.is_empty() {
                println!("{} ({} decimals)", token.name, token.decimals);
            }
        }
        Command::Recipients { text } => {
            form.set_recipients(text)?;
            println!("{} recipients", form.transfers().recipients().len());
        }
        Command::Amounts { text } => {
            form.set_amounts(text)?;
            println!(
                "{} amounts, {} in total",
                form.transfers().amounts().len(),
                form.total()
            );
        }
        Command::Show => show(&node, &form, args.ephemeral).await,
        Command::Clear => {
            form.clear()?;
            println!("cleared the form");
        }
        Command::Send => send(&node, &mut form).await?,
    }
    Ok(())
}

/// How to reach the chain.
struct Node<'a> {
    url: url::Url,
    signer: Option<PrivateKeySigner>,
    config: &'a Config,
}

impl Node<'_> {
    async fn connect(&self) -> Result<Ethereum> {
        Ethereum::new(
            &self.url,
            self.signer.clone(),
            self.config.receipt_poll_interval,
        )
        .await
    }

    /// Like [`Node::connect`] for commands that still work offline.
    async fn try_connect(&self) -> Option<Arc<Ethereum>> {
        match self.connect().await {
            Ok(eth) => Some(Arc::new(eth)),
            Err(err) => {
                tracing::warn!(?err, "node unavailable");
                None
            }
        }
    }
}

/// Metadata of the entered token, or placeholder values without a node.
async fn token_context(chain: Option<Arc<dyn ChainRead>>, address: &str) -> TokenContext {
    match chain {
        Some(chain) => TokenMetadataResolver::new(chain)
            .resolve(address)
            .await
            .unwrap_or_default(),
        None => TokenContext::default(),
    }
}

/// State of the submit control.
fn submit_state(form: &Form, wallet: Option<&Wallet>) -> &'static str {
    match wallet {
        Some(wallet) if form.can_submit(wallet) => "ready",
        _ => "disabled",
    }
}

async fn show(node: &Node<'_>, form: &Form, ephemeral: bool) {
    println!("Token address: {}", form.token_address());
    println!("Recipients:\n{}", form.recipients());
    println!("Amounts:\n{}", form.amounts());
    if form.has_saved_inputs() && !ephemeral {
        println!("(inputs are saved in {:?})", node.config.storage);
    }

    let eth = node.try_connect().await;
    let chain = eth.clone().map(|eth| eth as Arc<dyn ChainRead>);
    if let Some(details) = form.details(&token_context(chain, form.token_address()).await) {
        println!("\n{details}");
    }

    let wallet = eth.map(|eth| eth.wallet());
    println!(
        "\n[{}] {}",
        Phase::Idle.label(),
        submit_state(form, wallet.as_ref())
    );
}

async fn send(node: &Node<'_>, form: &mut Form) -> Result<()> {
    let config = node.config;
    let eth = Arc::new(node.connect().await?);
    let token = TokenMetadataResolver::new(eth.clone())
        .resolve(form.token_address())
        .await
        .unwrap_or_default();
    if let Some(details) = form.details(&token) {
        println!("{details}\n");
    }

    let orchestrator = Orchestrator::new(
        eth.clone(),
        AllowanceChecker::new(eth.clone()),
        config.spenders.clone(),
        Arc::new(Console::new(config.explorer.clone(), token.decimals)),
    )
    .with_confirmation_timeout(config.confirmation_timeout);

    let (handle, cancel) = cancellation();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, no longer waiting for inclusion");
            handle.cancel();
        }
    });
    let result = orchestrator
        .submit(&form.request(eth.wallet()), &cancel)
        .await;
    interrupt.abort();

    result.context("airdrop was not sent")?;
    if config.clear_on_success {
        form.clear()?;
        tracing::debug!("cleared form after successful airdrop");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{domain::chain::MockChainRead, infra::MemoryStore},
        alloy::primitives::{Address, address},
        mockall::predicate::*,
    };

    const TOKEN: Address = address!("0x00000000000000000000000000000000000000aa");

    #[tokio::test]
    async fn token_context_uses_the_given_connection() {
        let mut chain = MockChainRead::new();
        chain
            .expect_name()
            .with(eq(TOKEN))
            .times(1)
            .returning(|_| Ok("Airdrop Token".to_string()));
        chain
            .expect_decimals()
            .with(eq(TOKEN))
            .times(1)
            .returning(|_| Ok(6));

        let token = token_context(Some(Arc::new(chain)), &TOKEN.to_string()).await;
        assert_eq!(token.name, "Airdrop Token");
        assert_eq!(token.decimals, 6);
    }

    #[tokio::test]
    async fn token_context_offline() {
        assert_eq!(
            token_context(None, &TOKEN.to_string()).await,
            TokenContext::default()
        );
    }

    #[test]
    fn submit_needs_a_connected_wallet() {
        let mut form = Form::load(Arc::new(MemoryStore::default()));
        form.set_token_address(TOKEN.to_string()).unwrap();
        form.set_recipients("0x00000000000000000000000000000000000000a1")
            .unwrap();
        form.set_amounts("100").unwrap();

        let wallet = Wallet {
            address: Some(address!("0x00000000000000000000000000000000000000bb")),
            chain_id: 31337,
        };
        assert_eq!(submit_state(&form, Some(&wallet)), "ready");
        assert_eq!(submit_state(&form, None), "disabled");
        assert_eq!(
            submit_state(
                &form,
                Some(&Wallet {
                    address: None,
                    ..wallet
                })
            ),
            "disabled"
        );
    }
}
