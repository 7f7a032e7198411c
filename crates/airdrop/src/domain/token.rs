//! Display metadata (name and decimals) of the token being sent. Nothing in
//! here influences what gets submitted on-chain.

use {
    super::{DegradeToDefault, chain::ChainRead},
    alloy::primitives::Address,
    regex::Regex,
    std::sync::{
        Arc,
        LazyLock,
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

pub const UNKNOWN_TOKEN: &str = "Unknown Token";
pub const DEFAULT_DECIMALS: u8 = 18;

static ADDRESS_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^0x[a-fA-F0-9]{40}$").expect("valid regex"));

/// Whether `text` looks like a `0x`-prefixed, 20 byte hex address.
pub fn is_address_format(text: &str) -> bool {
    ADDRESS_FORMAT.is_match(text)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenContext {
    /// `None` unless the entered text is a well formed address.
    pub address: Option<Address>,
    /// Empty until metadata was resolved.
    pub name: String,
    pub decimals: u8,
}

impl Default for TokenContext {
    fn default() -> Self {
        Self {
            address: None,
            name: String::new(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl TokenContext {
    fn unknown(address: Address) -> Self {
        Self {
            address: Some(address),
            name: UNKNOWN_TOKEN.to_string(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

/// Resolves [`TokenContext`]s whenever the token address changes.
///
/// Resolutions may overlap. Each one takes a ticket from a sequence counter
/// and only the result of the most recent request is kept, regardless of the
/// order in which responses arrive.
pub struct TokenMetadataResolver {
    chain: Arc<dyn ChainRead>,
    sequence: AtomicU64,
    current: Mutex<TokenContext>,
}

impl TokenMetadataResolver {
    pub fn new(chain: Arc<dyn ChainRead>) -> Self {
        Self {
            chain,
            sequence: AtomicU64::new(0),
            current: Mutex::new(TokenContext::default()),
        }
    }

    /// The context of the latest applied resolution.
    pub fn current(&self) -> TokenContext {
        self.current.lock().unwrap().clone()
    }

    /// Resolves the metadata for the entered token address. Returns the new
    /// context, or `None` if a newer request was issued in the meantime and
    /// this result was discarded.
    pub async fn resolve(&self, address: &str) -> Option<TokenContext> {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let context = self.fetch(address).await;

        let mut current = self.current.lock().unwrap();
        let latest = self.sequence.load(Ordering::SeqCst);
        if ticket != latest {
            tracing::debug!(ticket, latest, address, "discarding stale token metadata");
            return None;
        }
        *current = context.clone();
        Some(context)
    }

    async fn fetch(&self, address: &str) -> TokenContext {
        if !is_address_format(address) {
            return TokenContext::default();
        }
        let Ok(token) = address.parse::<Address>() else {
            return TokenContext::default();
        };

        let (name, decimals) = futures::join!(self.chain.name(token), self.chain.decimals(token));
        DegradeToDefault::apply(
            name.and_then(|name| {
                Ok(TokenContext {
                    address: Some(token),
                    name,
                    decimals: decimals?,
                })
            }),
            || TokenContext::unknown(token),
            "token metadata",
        )
    }
}
