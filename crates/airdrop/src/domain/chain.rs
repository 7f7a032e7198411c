//! Trait definitions for the contract-call provider.
//!
//! These abstract the node and wallet so the airdrop flow can be unit tested
//! with mocks.

use {
    alloy::primitives::{Address, TxHash, U256},
    async_trait::async_trait,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The wallet refused to sign, most commonly because the user declined the
    /// prompt.
    #[error("{0}")]
    Rejected(String),
    /// The contract call reverted.
    #[error("{0}")]
    Reverted(String),
    /// The node could not be reached or answered with an error unrelated to
    /// the contract.
    #[error("{0}")]
    Network(String),
}

/// A transaction that was included in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub tx: TxHash,
    pub block: Option<u64>,
    /// `false` if the transaction reverted.
    pub success: bool,
}

/// Read-only contract calls.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait ChainRead: Send + Sync {
    /// The `name()` of an ERC-20 token.
    async fn name(&self, token: Address) -> Result<String, Error>;

    /// The `decimals()` of an ERC-20 token.
    async fn decimals(&self, token: Address) -> Result<u8, Error>;

    /// The amount `spender` may transfer on behalf of `owner`.
    async fn allowance(&self, token: Address, owner: Address, spender: Address)
    -> Result<U256, Error>;
}

/// Transactions signed by the connected wallet.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait ChainWrite: Send + Sync {
    /// Submits `approve(spender, amount)` on the token and returns as soon as
    /// the wallet signed and broadcast the transaction.
    async fn approve(&self, token: Address, spender: Address, amount: U256)
    -> Result<TxHash, Error>;

    /// Submits `airdropERC20(token, recipients, amounts, total)` on the spender
    /// contract.
    async fn airdrop(
        &self,
        spender: Address,
        token: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        total: U256,
    ) -> Result<TxHash, Error>;

    /// Waits until the transaction is included in a block. There is no upper
    /// bound on how long this takes, callers apply their own timeout.
    async fn wait_for_receipt(&self, tx: TxHash) -> Result<Receipt, Error>;
}
