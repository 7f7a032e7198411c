//! Access to an Ethereum node through `alloy`.

use {
    crate::domain::{
        Wallet,
        chain::{self, ChainRead, ChainWrite, Receipt},
    },
    alloy::{
        network::EthereumWallet,
        primitives::{Address, TxHash, U256},
        providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result},
    async_trait::async_trait,
    contracts::alloy::{ERC20, TSender},
    std::time::Duration,
    url::Url,
};

mod errors;

pub use errors::{classify, pending_transaction};

/// The Ethereum blockchain, optionally with an account that signs
/// transactions.
pub struct Ethereum {
    provider: DynProvider,
    chain_id: u64,
    account: Option<Address>,
}

impl Ethereum {
    /// Connects to the node at `url`. Without a `signer` only reads are
    /// possible. Inclusion of submitted transactions is checked every
    /// `poll_interval`.
    pub async fn new(
        url: &Url,
        signer: Option<PrivateKeySigner>,
        poll_interval: Duration,
    ) -> Result<Self> {
        let rpc = ClientBuilder::default()
            .http(url.clone())
            .with_poll_interval(poll_interval);
        let account = signer.as_ref().map(PrivateKeySigner::address);
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::new(signer))
                .connect_client(rpc)
                .erased(),
            None => ProviderBuilder::new().connect_client(rpc).erased(),
        };
        let chain_id = provider
            .get_chain_id()
            .await
            .with_context(|| format!("could not fetch chain id from {url}"))?;
        tracing::debug!(chain_id, ?account, "connected to node");

        Ok(Self {
            provider,
            chain_id,
            account,
        })
    }

    /// The wallet session backed by the configured signer.
    pub fn wallet(&self) -> Wallet {
        Wallet {
            address: self.account,
            chain_id: self.chain_id,
        }
    }

    fn sender(&self) -> Result<Address, chain::Error> {
        self.account
            .ok_or_else(|| chain::Error::Rejected("no signing account configured".to_string()))
    }
}

#[async_trait]
impl ChainRead for Ethereum {
    async fn name(&self, token: Address) -> Result<String, chain::Error> {
        ERC20::Instance::new(token, self.provider.clone())
            .name()
            .call()
            .await
            .map_err(classify)
    }

    async fn decimals(&self, token: Address) -> Result<u8, chain::Error> {
        ERC20::Instance::new(token, self.provider.clone())
            .decimals()
            .call()
            .await
            .map_err(classify)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, chain::Error> {
        ERC20::Instance::new(token, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl ChainWrite for Ethereum {
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, chain::Error> {
        let pending = ERC20::Instance::new(token, self.provider.clone())
            .approve(spender, amount)
            .from(self.sender()?)
            .send()
            .await
            .map_err(classify)?;
        Ok(*pending.tx_hash())
    }

    async fn airdrop(
        &self,
        spender: Address,
        token: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        total: U256,
    ) -> Result<TxHash, chain::Error> {
        let pending = TSender::Instance::new(spender, self.provider.clone())
            .airdropERC20(token, recipients, amounts, total)
            .from(self.sender()?)
            .send()
            .await
            .map_err(classify)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx: TxHash) -> Result<Receipt, chain::Error> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx)
            .get_receipt()
            .await
            .map_err(pending_transaction)?;
        Ok(Receipt {
            tx,
            block: receipt.block_number,
            success: receipt.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{providers::mock::Asserter, rpc::json_rpc::ErrorPayload},
        contracts::alloy::networks::ANVIL,
    };

    fn mocked(asserter: Asserter) -> Ethereum {
        Ethereum {
            provider: ProviderBuilder::new()
                .connect_mocked_client(asserter)
                .erased(),
            chain_id: ANVIL,
            account: None,
        }
    }

    #[tokio::test]
    async fn receipt_wait_fails_when_node_errors() {
        let asserter = Asserter::new();
        for _ in 0..16 {
            asserter.push_failure(ErrorPayload {
                code: -32603,
                message: "node down".into(),
                data: None,
            });
        }

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            mocked(asserter).wait_for_receipt(TxHash::ZERO),
        )
        .await
        .expect("node errors end the wait");
        assert!(matches!(result, Err(chain::Error::Network(_))));
    }

    #[tokio::test]
    async fn wallet_without_signer_is_disconnected() {
        let eth = mocked(Asserter::new());
        assert_eq!(
            eth.wallet(),
            Wallet {
                address: None,
                chain_id: ANVIL,
            }
        );
        assert!(matches!(
            eth.approve(Address::ZERO, Address::ZERO, U256::ZERO).await,
            Err(chain::Error::Rejected(_))
        ));
    }
}
