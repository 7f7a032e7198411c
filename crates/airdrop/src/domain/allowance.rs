use {
    super::{Error, chain::ChainRead},
    alloy::primitives::{Address, U256},
    std::{collections::HashMap, sync::Arc},
};

/// Maps chain ids to the deployed spender (airdrop) contract of that chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpenderRegistry(HashMap<u64, Address>);

impl SpenderRegistry {
    pub fn new(deployments: HashMap<u64, Address>) -> Self {
        Self(deployments)
    }

    /// Sets the spender for a chain. `None` removes it, so the chain reports
    /// [`Error::NoSaferVariant`].
    pub fn with_spender(mut self, chain_id: u64, spender: Option<Address>) -> Self {
        match spender {
            Some(spender) => self.0.insert(chain_id, spender),
            None => self.0.remove(&chain_id),
        };
        self
    }

    pub fn spender(&self, chain_id: u64) -> Option<Address> {
        self.0.get(&chain_id).copied()
    }
}

/// An ERC-20 allowance.
///
/// https://eips.ethereum.org/EIPS/eip-20
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}

/// An allowance that's already in effect, this essentially models the result of
/// the allowance() method, see https://eips.ethereum.org/EIPS/eip-20#methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Existing(pub Allowance);

/// An allowance that is required for the airdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Required(pub Allowance);

impl Required {
    /// Check if this allowance needs to be approved, and if so, return the
    /// appropriate [`Approval`]. An existing allowance that is exactly as large
    /// as the required one is sufficient.
    pub fn approval(&self, existing: &Existing) -> Option<Approval> {
        let same_spender =
            self.0.token == existing.0.token && self.0.spender == existing.0.spender;
        if same_spender && self.0.amount <= existing.0.amount {
            None
        } else {
            Some(Approval(self.0))
        }
    }
}

/// An approval which needs to be made with an approve() call, see
/// https://eips.ethereum.org/EIPS/eip-20#methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approval(pub Allowance);

pub struct AllowanceChecker {
    chain: Arc<dyn ChainRead>,
}

impl AllowanceChecker {
    pub fn new(chain: Arc<dyn ChainRead>) -> Self {
        Self { chain }
    }

    /// Reads the current allowance of `owner` for `spender`. Fails with
    /// [`Error::NoSaferVariant`] without touching the chain if there is no
    /// spender.
    pub async fn check_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Option<Address>,
    ) -> Result<Existing, Error> {
        let spender = spender.ok_or(Error::NoSaferVariant)?;
        let amount = self.chain.allowance(token, owner, spender).await?;
        tracing::debug!(?token, ?owner, ?spender, %amount, "fetched allowance");
        Ok(Existing(Allowance {
            token,
            spender,
            amount,
        }))
    }
}
