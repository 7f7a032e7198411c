//! The airdrop flow independent of any wallet, node or storage
//! implementation. Collaborators are injected through the traits in
//! [`chain`] and [`form`].

pub mod airdrop;
pub mod allowance;
pub mod amounts;
pub mod chain;
pub mod form;
pub mod token;

pub use {
    airdrop::{Orchestrator, Outcome, Phase, Request, TransactionPhase},
    allowance::{AllowanceChecker, SpenderRegistry},
    form::{Form, Key, Persistence},
    token::{TokenContext, TokenMetadataResolver},
};
use {
    alloy::primitives::{Address, TxHash},
    std::fmt::Display,
};

/// The connected wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    /// `None` while no wallet is connected.
    pub address: Option<Address>,
    pub chain_id: u64,
}

/// Errors signaled by an airdrop submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("please connect your wallet first")]
    WalletNotConnected,
    #[error("please enter token address")]
    MissingTokenAddress,
    #[error("please enter recipients and amounts")]
    MissingRecipientsOrAmounts,
    #[error("{0:?} is not a valid token address")]
    InvalidTokenAddress(String),
    #[error("{0:?} is not a valid recipient address")]
    InvalidRecipient(String),
    #[error("{0:?} is not a valid amount, expected an integer amount in the smallest token unit")]
    InvalidAmount(String),
    #[error("got {recipients} recipients but {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },
    #[error("an airdrop is already in progress")]
    SubmissionInProgress,
    #[error("this chain only has the safer version of the airdrop contract")]
    NoSaferVariant,
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("transaction {0} was not included within the confirmation timeout")]
    ConfirmationTimeout(TxHash),
    #[error("stopped waiting for transaction {0}")]
    Cancelled(TxHash),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input. Shown as a warning, nothing was sent.
    Validation,
    /// The connected chain can not be used. Nothing was sent.
    Configuration,
    /// Something went wrong while sending or confirming a transaction.
    /// Transactions that were already submitted are not rolled back.
    Transaction,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WalletNotConnected
            | Self::MissingTokenAddress
            | Self::MissingRecipientsOrAmounts
            | Self::InvalidTokenAddress(_)
            | Self::InvalidRecipient(_)
            | Self::InvalidAmount(_)
            | Self::LengthMismatch { .. }
            | Self::SubmissionInProgress => ErrorKind::Validation,
            Self::NoSaferVariant => ErrorKind::Configuration,
            Self::TransactionRejected(_)
            | Self::TransactionReverted(_)
            | Self::NetworkError(_)
            | Self::ConfirmationTimeout(_)
            | Self::Cancelled(_) => ErrorKind::Transaction,
        }
    }
}

impl From<chain::Error> for Error {
    fn from(err: chain::Error) -> Self {
        match err {
            chain::Error::Rejected(message) => Self::TransactionRejected(message),
            chain::Error::Reverted(message) => Self::TransactionReverted(message),
            chain::Error::Network(message) => Self::NetworkError(message),
        }
    }
}

/// Policy for failures that must never reach the user: an unparsable amount
/// counts as zero and unresolvable token metadata falls back to placeholder
/// values. The failure is only logged.
pub struct DegradeToDefault;

impl DegradeToDefault {
    pub fn apply<T, E: Display>(result: Result<T, E>, default: impl FnOnce() -> T, what: &str) -> T {
        result.unwrap_or_else(|err| {
            tracing::debug!(%err, what, "degrading to default value");
            default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(Error::WalletNotConnected.kind(), ErrorKind::Validation);
        assert_eq!(
            Error::LengthMismatch {
                recipients: 2,
                amounts: 1
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::NoSaferVariant.kind(), ErrorKind::Configuration);
        assert_eq!(
            Error::from(chain::Error::Rejected("user denied".to_string())),
            Error::TransactionRejected("user denied".to_string())
        );
        assert_eq!(
            Error::ConfirmationTimeout(TxHash::ZERO).kind(),
            ErrorKind::Transaction
        );
    }

    #[test]
    fn degrade_to_default() {
        assert_eq!(DegradeToDefault::apply(Ok::<_, String>(1), || 0, "test"), 1);
        assert_eq!(
            DegradeToDefault::apply(Err::<u32, _>("boom"), || 0, "test"),
            0
        );
    }
}
