//! Reports the progress of an airdrop on the terminal. Refusals and failures
//! are only logged, the caller reports the returned error.

use {
    crate::domain::{
        Error,
        Outcome,
        Phase,
        airdrop::{Notify, Step},
        amounts::display_tokens,
    },
    alloy::primitives::TxHash,
    url::Url,
};

pub struct Console {
    explorer: Url,
    /// Decimals of the token being sent, used to display the total.
    decimals: u8,
}

impl Console {
    pub fn new(explorer: Url, decimals: u8) -> Self {
        Self { explorer, decimals }
    }

    fn link(&self, tx: TxHash) -> String {
        match self.explorer.join(&tx.to_string()) {
            Ok(url) => url.to_string(),
            Err(_) => tx.to_string(),
        }
    }
}

impl Notify for Console {
    fn phase(&self, phase: Phase) {
        tracing::debug!(?phase, "airdrop phase");
        if phase.is_running() && phase != Phase::Validating {
            println!("{}...", phase.label());
        }
    }

    fn warning(&self, error: &Error) {
        tracing::warn!(%error, "airdrop refused");
    }

    fn submitted(&self, step: Step, tx: TxHash) {
        let what = match step {
            Step::Approval => "approval",
            Step::Airdrop => "airdrop",
        };
        println!("submitted {what} transaction {}", self.link(tx));
    }

    fn success(&self, outcome: &Outcome) {
        println!(
            "sent {} tokens in transaction {}",
            display_tokens(outcome.total, self.decimals),
            self.link(outcome.airdrop.tx),
        );
    }

    fn failure(&self, error: &Error) {
        tracing::error!(%error, kind = ?error.kind(), "airdrop failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_to_explorer() {
        let console = Console::new("https://etherscan.io/tx/".parse().unwrap(), 18);
        assert_eq!(
            console.link(TxHash::ZERO),
            format!("https://etherscan.io/tx/{}", TxHash::ZERO)
        );
    }
}
