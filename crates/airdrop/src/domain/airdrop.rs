//! Sequencing of the approval and airdrop transactions.

use {
    super::{
        Error,
        Wallet,
        allowance::{Allowance, AllowanceChecker, Existing, Required, SpenderRegistry},
        amounts::{TransferList, Transfers},
        chain::{ChainWrite, Receipt},
    },
    alloy::primitives::{Address, TxHash, U256},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::sync::watch,
};

/// Where an airdrop submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    /// Waiting for the wallet to sign the approval.
    ApprovingWallet,
    /// Waiting for the approval to be included in a block.
    ApprovingMined,
    /// Waiting for the wallet to sign the airdrop.
    AirdropWallet,
    /// Waiting for the airdrop to be included in a block.
    AirdropMined,
    Completed,
    Failed,
}

/// The state of a single submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPhase {
    Idle,
    AwaitingWalletConfirmation,
    AwaitingBlockInclusion,
    Completed,
    Failed,
}

impl Phase {
    pub fn transaction_phase(self) -> TransactionPhase {
        match self {
            Self::Idle | Self::Validating => TransactionPhase::Idle,
            Self::ApprovingWallet | Self::AirdropWallet => {
                TransactionPhase::AwaitingWalletConfirmation
            }
            Self::ApprovingMined | Self::AirdropMined => TransactionPhase::AwaitingBlockInclusion,
            Self::Completed => TransactionPhase::Completed,
            Self::Failed => TransactionPhase::Failed,
        }
    }

    /// Whether a submission is in flight, i.e. submitting is disabled.
    pub fn is_running(self) -> bool {
        !matches!(self, Self::Idle | Self::Completed | Self::Failed)
    }

    /// Text of the submit control.
    pub fn label(self) -> &'static str {
        match self.transaction_phase() {
            TransactionPhase::AwaitingWalletConfirmation => "Confirm in wallet",
            TransactionPhase::AwaitingBlockInclusion => "Waiting transaction to be included",
            _ => "Send tokens",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Approval,
    Airdrop,
}

/// Receives the progress of a submission.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait Notify: Send + Sync {
    fn phase(&self, phase: Phase);

    /// A submission was refused before anything was sent.
    fn warning(&self, error: &Error);

    fn submitted(&self, step: Step, tx: TxHash);

    fn success(&self, outcome: &Outcome);

    /// A submission failed after it started talking to the chain.
    fn failure(&self, error: &Error);
}

/// The raw form inputs of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub wallet: Wallet,
    pub token: String,
    pub recipients: String,
    pub amounts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Only set if the existing allowance was too small.
    pub approval: Option<Receipt>,
    pub airdrop: Receipt,
    pub total: U256,
}

/// Creates a connected [`CancelHandle`] and [`Cancellation`].
pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (sender, receiver) = watch::channel(false);
    (CancelHandle(sender), Cancellation(receiver))
}

/// Stops waiting for block inclusion. A transaction that was already
/// broadcast stays broadcast.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct Cancellation(watch::Receiver<bool>);

impl Cancellation {
    /// A cancellation that never fires.
    pub fn never() -> Self {
        cancellation().1
    }

    /// Resolves once [`CancelHandle::cancel`] was called. Never resolves if the
    /// handle was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.0.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives an airdrop submission: validates the inputs, approves the spender
/// contract if the current allowance does not cover the total and then sends
/// the airdrop, waiting for each transaction to be included.
///
/// Only one submission runs at a time.
pub struct Orchestrator {
    chain: Arc<dyn ChainWrite>,
    allowances: AllowanceChecker,
    spenders: SpenderRegistry,
    notify: Arc<dyn Notify>,
    confirmation_timeout: Option<Duration>,
    running: AtomicBool,
}

struct Validated {
    owner: Address,
    token: Address,
    transfers: Transfers,
}

impl Orchestrator {
    pub fn new(
        chain: Arc<dyn ChainWrite>,
        allowances: AllowanceChecker,
        spenders: SpenderRegistry,
        notify: Arc<dyn Notify>,
    ) -> Self {
        Self {
            chain,
            allowances,
            spenders,
            notify,
            confirmation_timeout: None,
            running: AtomicBool::new(false),
        }
    }

    /// Gives up waiting for a transaction to be included after `timeout`.
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, request: &Request, cancel: &Cancellation) -> Result<Outcome, Error> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            let err = Error::SubmissionInProgress;
            self.notify.warning(&err);
            return Err(err);
        };

        self.notify.phase(Phase::Validating);
        let validated = match validate(request) {
            Ok(validated) => validated,
            Err(err) => return Err(self.refuse(err)),
        };

        let spender = self.spenders.spender(request.wallet.chain_id);
        let existing = match self
            .allowances
            .check_allowance(validated.token, validated.owner, spender)
            .await
        {
            Ok(existing) => existing,
            Err(err @ Error::NoSaferVariant) => {
                tracing::warn!(chain_id = request.wallet.chain_id, "no spender contract");
                return Err(self.refuse(err));
            }
            Err(err) => return Err(self.fail(err)),
        };

        match self.execute(validated, existing, cancel).await {
            Ok(outcome) => {
                tracing::info!(tx = %outcome.airdrop.tx, total = %outcome.total, "airdrop completed");
                self.notify.phase(Phase::Completed);
                self.notify.success(&outcome);
                self.notify.phase(Phase::Idle);
                Ok(outcome)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn execute(
        &self,
        validated: Validated,
        existing: Existing,
        cancel: &Cancellation,
    ) -> Result<Outcome, Error> {
        let Validated {
            token, transfers, ..
        } = validated;
        let spender = existing.0.spender;
        let required = Required(Allowance {
            token,
            spender,
            amount: transfers.total,
        });

        let approval = match required.approval(&existing) {
            Some(approval) => {
                tracing::info!(
                    current = %existing.0.amount,
                    required = %approval.0.amount,
                    "allowance too small, approving spender"
                );
                let receipt = self
                    .send(Step::Approval, cancel, || {
                        self.chain.approve(token, spender, approval.0.amount)
                    })
                    .await?;
                Some(receipt)
            }
            None => None,
        };

        let Transfers {
            recipients,
            amounts,
            total,
        } = transfers;
        let airdrop = self
            .send(Step::Airdrop, cancel, || {
                self.chain
                    .airdrop(spender, token, recipients, amounts, total)
            })
            .await?;

        Ok(Outcome {
            approval,
            airdrop,
            total,
        })
    }

    /// Submits a transaction and waits for it to be included.
    async fn send<F>(
        &self,
        step: Step,
        cancel: &Cancellation,
        submit: impl FnOnce() -> F,
    ) -> Result<Receipt, Error>
    where
        F: Future<Output = Result<TxHash, super::chain::Error>>,
    {
        let (signing, mining) = match step {
            Step::Approval => (Phase::ApprovingWallet, Phase::ApprovingMined),
            Step::Airdrop => (Phase::AirdropWallet, Phase::AirdropMined),
        };

        self.notify.phase(signing);
        let tx = submit().await?;
        tracing::debug!(?step, %tx, "transaction submitted");
        self.notify.submitted(step, tx);

        self.notify.phase(mining);
        let receipt = self.confirm(tx, cancel).await?;
        if !receipt.success {
            return Err(Error::TransactionReverted(format!("transaction {tx} reverted")));
        }
        tracing::debug!(?step, %tx, block = ?receipt.block, "transaction included");
        Ok(receipt)
    }

    async fn confirm(&self, tx: TxHash, cancel: &Cancellation) -> Result<Receipt, Error> {
        let wait = async {
            let receipt = self.chain.wait_for_receipt(tx);
            match self.confirmation_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, receipt).await {
                    Ok(result) => result.map_err(Error::from),
                    Err(_) => Err(Error::ConfirmationTimeout(tx)),
                },
                None => receipt.await.map_err(Error::from),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled(tx)),
            receipt = wait => receipt,
        }
    }

    /// The submission was refused before anything happened on-chain.
    fn refuse(&self, err: Error) -> Error {
        tracing::debug!(%err, "airdrop refused");
        self.notify.warning(&err);
        self.notify.phase(Phase::Idle);
        err
    }

    fn fail(&self, err: Error) -> Error {
        tracing::warn!(%err, "airdrop failed");
        self.notify.phase(Phase::Failed);
        self.notify.failure(&err);
        self.notify.phase(Phase::Idle);
        err
    }
}

fn validate(request: &Request) -> Result<Validated, Error> {
    let owner = request.wallet.address.ok_or(Error::WalletNotConnected)?;
    let token = request.token.trim();
    if token.is_empty() {
        return Err(Error::MissingTokenAddress);
    }
    let transfers = TransferList::new(&request.recipients, &request.amounts);
    if transfers.is_empty() {
        return Err(Error::MissingRecipientsOrAmounts);
    }
    let token = token
        .parse::<Address>()
        .map_err(|_| Error::InvalidTokenAddress(token.to_string()))?;

    Ok(Validated {
        owner,
        token,
        transfers: transfers.validate()?,
    })
}

/// Marks the orchestrator as running for as long as it is alive.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Option<Self> {
        running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(running))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
