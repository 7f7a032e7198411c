//! The airdrop form: three free-text inputs that survive restarts.

use {
    super::{
        Wallet,
        airdrop::Request,
        amounts::{self, TransferList},
        token::TokenContext,
    },
    alloy::primitives::U256,
    anyhow::Result,
    std::{fmt, sync::Arc},
};

/// The logical keys of the persisted form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    TokenAddress,
    Recipients,
    Amounts,
}

impl Key {
    pub const ALL: [Self; 3] = [Self::TokenAddress, Self::Recipients, Self::Amounts];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TokenAddress => "airdrop_token_address",
            Self::Recipients => "airdrop_recipients",
            Self::Amounts => "airdrop_amounts",
        }
    }
}

/// Durable key-value storage for the raw form inputs.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait Persistence: Send + Sync {
    fn get(&self, key: Key) -> Option<String>;

    fn set(&self, key: Key, value: &str) -> Result<()>;

    fn remove(&self, key: Key) -> Result<()>;
}

pub struct Form {
    store: Arc<dyn Persistence>,
    token_address: String,
    recipients: String,
    amounts: String,
}

impl Form {
    /// Restores the inputs that were saved last.
    pub fn load(store: Arc<dyn Persistence>) -> Self {
        Self {
            token_address: store.get(Key::TokenAddress).unwrap_or_default(),
            recipients: store.get(Key::Recipients).unwrap_or_default(),
            amounts: store.get(Key::Amounts).unwrap_or_default(),
            store,
        }
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn recipients(&self) -> &str {
        &self.recipients
    }

    pub fn amounts(&self) -> &str {
        &self.amounts
    }

    pub fn set_token_address(&mut self, value: impl Into<String>) -> Result<()> {
        self.token_address = value.into();
        self.store.set(Key::TokenAddress, &self.token_address)
    }

    pub fn set_recipients(&mut self, value: impl Into<String>) -> Result<()> {
        self.recipients = value.into();
        self.store.set(Key::Recipients, &self.recipients)
    }

    pub fn set_amounts(&mut self, value: impl Into<String>) -> Result<()> {
        self.amounts = value.into();
        self.store.set(Key::Amounts, &self.amounts)
    }

    /// Empties all inputs and forgets the saved ones.
    pub fn clear(&mut self) -> Result<()> {
        self.token_address.clear();
        self.recipients.clear();
        self.amounts.clear();
        for key in Key::ALL {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// Whether anything was entered (and therefore saved).
    pub fn has_saved_inputs(&self) -> bool {
        !self.token_address.is_empty() || !self.recipients.is_empty() || !self.amounts.is_empty()
    }

    /// Whether the form may be submitted. Input problems beyond missing values
    /// are reported by the submission itself.
    pub fn can_submit(&self, wallet: &Wallet) -> bool {
        wallet.address.is_some()
            && !self.token_address.is_empty()
            && !self.recipients.is_empty()
            && !self.amounts.is_empty()
    }

    pub fn total(&self) -> U256 {
        amounts::compute_total(amounts::parse(&self.amounts).as_slice())
    }

    pub fn transfers(&self) -> TransferList<'_> {
        TransferList::new(&self.recipients, &self.amounts)
    }

    pub fn request(&self, wallet: Wallet) -> Request {
        Request {
            wallet,
            token: self.token_address.clone(),
            recipients: self.recipients.clone(),
            amounts: self.amounts.clone(),
        }
    }

    /// A summary of what is about to be sent. Only available once a token and
    /// amounts were entered.
    pub fn details(&self, token: &TokenContext) -> Option<Details> {
        if self.token_address.is_empty() || self.amounts.is_empty() {
            return None;
        }

        let entered = amounts::parse(&self.amounts);
        let total = amounts::compute_total(entered.as_slice());
        Some(Details {
            token_name: match token.name.as_str() {
                "" => "Loading...".to_string(),
                name => name.to_string(),
            },
            amounts_wei: entered.iter().map(|amount| amount.to_string()).collect(),
            amounts_tokens: amounts::to_display_tokens(entered.as_slice(), token.decimals),
            total_wei: total,
            total_tokens: amounts::display_tokens(total, token.decimals),
        })
    }
}

/// The transaction details shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    pub token_name: String,
    pub amounts_wei: Vec<String>,
    pub amounts_tokens: Vec<String>,
    pub total_wei: U256,
    pub total_tokens: String,
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction Details")?;
        writeln!(f, "  Token name:      {}", self.token_name)?;
        writeln!(f, "  Amount (wei):    {}", self.amounts_wei.join(", "))?;
        writeln!(f, "  Amount (tokens): {}", self.amounts_tokens.join(", "))?;
        write!(
            f,
            "  Total:           {} ({} tokens)",
            self.total_wei, self.total_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::infra::persistence::MemoryStore,
        alloy::primitives::address,
        mockall::predicate::*,
    };

    const WALLET: Wallet = Wallet {
        address: Some(address!("0x00000000000000000000000000000000000000bb")),
        chain_id: 31337,
    };

    #[test]
    fn inputs_are_written_through() {
        let store = Arc::new(MemoryStore::default());
        let mut form = Form::load(store.clone());
        assert!(!form.has_saved_inputs());

        form.set_token_address("0x00000000000000000000000000000000000000aa")
            .unwrap();
        form.set_recipients("0x00000000000000000000000000000000000000a1")
            .unwrap();
        form.set_amounts("100,\n200").unwrap();
        assert!(form.has_saved_inputs());

        let restored = Form::load(store);
        assert_eq!(
            restored.token_address(),
            "0x00000000000000000000000000000000000000aa"
        );
        assert_eq!(
            restored.recipients(),
            "0x00000000000000000000000000000000000000a1"
        );
        assert_eq!(restored.amounts(), "100,\n200");
        assert_eq!(restored.total(), U256::from(300));
    }

    #[test]
    fn clear_removes_saved_inputs() {
        let mut store = MockPersistence::new();
        store.expect_get().returning(|_| Some("saved".to_string()));
        for key in Key::ALL {
            store
                .expect_remove()
                .with(eq(key))
                .times(1)
                .returning(|_| Ok(()));
        }

        let mut form = Form::load(Arc::new(store));
        assert_eq!(form.amounts(), "saved");
        form.clear().unwrap();
        assert!(!form.has_saved_inputs());
    }

    #[test]
    fn can_submit_requires_wallet_and_inputs() {
        let mut form = Form::load(Arc::new(MemoryStore::default()));
        form.set_token_address("0x00000000000000000000000000000000000000aa")
            .unwrap();
        form.set_recipients("0x00000000000000000000000000000000000000a1")
            .unwrap();
        assert!(!form.can_submit(&WALLET));

        form.set_amounts("1").unwrap();
        assert!(form.can_submit(&WALLET));
        assert!(!form.can_submit(&Wallet {
            address: None,
            ..WALLET
        }));
    }

    #[test]
    fn details() {
        let mut form = Form::load(Arc::new(MemoryStore::default()));
        assert_eq!(form.details(&TokenContext::default()), None);

        form.set_token_address("0x00000000000000000000000000000000000000aa")
            .unwrap();
        form.set_amounts("1500000, x, 500000").unwrap();

        let details = form.details(&TokenContext::default()).unwrap();
        assert_eq!(details.token_name, "Loading...");

        let token = TokenContext {
            address: Some(address!("0x00000000000000000000000000000000000000aa")),
            name: "USD Coin".to_string(),
            decimals: 6,
        };
        let details = form.details(&token).unwrap();
        assert_eq!(
            details,
            Details {
                token_name: "USD Coin".to_string(),
                amounts_wei: vec![
                    "1500000".to_string(),
                    "x".to_string(),
                    "500000".to_string()
                ],
                amounts_tokens: vec!["1.5".to_string(), "0".to_string(), "0.5".to_string()],
                total_wei: U256::from(2_000_000),
                total_tokens: "2".to_string(),
            }
        );
        assert!(details.to_string().contains("Amount (tokens): 1.5, 0, 0.5"));
    }
}
