//! Parsing of the free-text recipient and amount lists.

use {
    super::{DegradeToDefault, Error},
    alloy::primitives::{Address, U256},
    number::{conversions::parse_decimal_u256, units::format_units},
};

/// Splits `text` on commas and newlines, trims every entry and drops empty
/// ones. The order of the remaining entries is preserved.
pub fn parse(text: &str) -> Vec<&str> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Sums up all amounts. Entries that are not base-10 integers count as zero.
/// The sum saturates at [`U256::MAX`].
pub fn compute_total<S: AsRef<str>>(amounts: &[S]) -> U256 {
    amounts
        .iter()
        .map(|amount| amount_or_zero(amount.as_ref()))
        .fold(U256::ZERO, U256::saturating_add)
}

/// Converts amounts in the smallest token unit into whole tokens for display.
/// Entries that are not base-10 integers are shown as `"0"`.
pub fn to_display_tokens<S: AsRef<str>>(amounts: &[S], decimals: u8) -> Vec<String> {
    amounts
        .iter()
        .map(|amount| display_tokens(amount_or_zero(amount.as_ref()), decimals))
        .collect()
}

/// Formats an amount in the smallest token unit as whole tokens. Shows `"0"`
/// if the decimals are out of range.
pub fn display_tokens(amount: U256, decimals: u8) -> String {
    DegradeToDefault::apply(
        format_units(amount, decimals),
        || "0".to_string(),
        "token amount",
    )
}

fn amount_or_zero(amount: &str) -> U256 {
    DegradeToDefault::apply(
        parse_decimal_u256(amount).ok_or("not a base-10 integer"),
        || U256::ZERO,
        "amount",
    )
}

/// The recipients and amounts as entered, paired up by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferList<'a> {
    recipients: Vec<&'a str>,
    amounts: Vec<&'a str>,
}

impl<'a> TransferList<'a> {
    pub fn new(recipients: &'a str, amounts: &'a str) -> Self {
        Self {
            recipients: parse(recipients),
            amounts: parse(amounts),
        }
    }

    pub fn recipients(&self) -> &[&'a str] {
        &self.recipients
    }

    pub fn amounts(&self) -> &[&'a str] {
        &self.amounts
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty() || self.amounts.is_empty()
    }

    /// The recipient and amount pairs. Surplus entries of the longer list are
    /// not part of any pair.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.recipients
            .iter()
            .copied()
            .zip(self.amounts.iter().copied())
    }

    pub fn total(&self) -> U256 {
        compute_total(self.amounts.as_slice())
    }

    /// Checks that the list can be sent as is: both lists have the same
    /// length, every recipient is an address and every amount an integer.
    pub fn validate(&self) -> Result<Transfers, Error> {
        if self.recipients.len() != self.amounts.len() {
            return Err(Error::LengthMismatch {
                recipients: self.recipients.len(),
                amounts: self.amounts.len(),
            });
        }

        let mut transfers = Transfers::default();
        for (recipient, amount) in self.pairs() {
            let recipient = recipient
                .parse::<Address>()
                .map_err(|_| Error::InvalidRecipient(recipient.to_string()))?;
            let amount =
                parse_decimal_u256(amount).ok_or_else(|| Error::InvalidAmount(amount.to_string()))?;
            transfers.recipients.push(recipient);
            transfers.amounts.push(amount);
            transfers.total = transfers.total.saturating_add(amount);
        }
        Ok(transfers)
    }
}

/// A validated [`TransferList`], ready to be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transfers {
    pub recipients: Vec<Address>,
    pub amounts: Vec<U256>,
    pub total: U256,
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address, number::units::EthUnit};

    #[test]
    fn parse_drops_blank_entries_and_keeps_order() {
        assert_eq!(parse("10, 20,,\n30\n\n,  ,40"), ["10", "20", "30", "40"]);
        assert_eq!(parse("c\r\nb\r\na"), ["c", "b", "a"]);
        assert!(parse("").is_empty());
        assert!(parse(" ,\n, ").is_empty());
    }

    #[test]
    fn total_ignores_unparsable_amounts() {
        assert_eq!(compute_total(&["10", "abc", "20"]), U256::from(30));
        assert_eq!(compute_total(&["1.5", "-3", "0x10"]), U256::ZERO);
        assert_eq!(compute_total::<&str>(&[]), U256::ZERO);
    }

    #[test]
    fn total_saturates() {
        let max = U256::MAX.to_string();
        assert_eq!(compute_total(&[max.as_str(), "1"]), U256::MAX);
    }

    #[test]
    fn display_tokens() {
        assert_eq!(to_display_tokens(&["1000000000000000000"], 18), ["1"]);
        assert_eq!(
            to_display_tokens(&["1500000", "nope", "1"], 6),
            ["1.5", "0", "0.000001"]
        );
        assert_eq!(to_display_tokens(&["1", "25"], 80), ["0", "0"]);
        assert_eq!(super::display_tokens(U256::from(25), 0), "25");
    }

    #[test]
    fn transfer_list_validates() {
        let list = TransferList::new(
            "0x00000000000000000000000000000000000000a1,\n0x00000000000000000000000000000000000000a2",
            "100, 200",
        );
        assert_eq!(
            list.validate().unwrap(),
            Transfers {
                recipients: vec![
                    address!("0x00000000000000000000000000000000000000a1"),
                    address!("0x00000000000000000000000000000000000000a2"),
                ],
                amounts: vec![U256::from(100), U256::from(200)],
                total: U256::from(300),
            }
        );
    }

    #[test]
    fn transfer_list_rejects_mismatched_lengths() {
        let list = TransferList::new("0x00000000000000000000000000000000000000a1", "1, 2");
        assert_eq!(list.pairs().count(), 1);
        assert_eq!(
            list.validate(),
            Err(Error::LengthMismatch {
                recipients: 1,
                amounts: 2
            })
        );
    }

    #[test]
    fn transfer_list_rejects_bad_entries() {
        let list = TransferList::new("0x00000000000000000000000000000000000000a1, bob", "1, 2");
        assert_eq!(
            list.validate(),
            Err(Error::InvalidRecipient("bob".to_string()))
        );

        let list = TransferList::new("0x00000000000000000000000000000000000000a1", "1.5");
        assert_eq!(list.total(), U256::ZERO);
        assert_eq!(
            list.validate(),
            Err(Error::InvalidAmount("1.5".to_string()))
        );
    }

    #[test]
    fn transfer_list_total_in_eth() {
        let list = TransferList::new(
            "0x00000000000000000000000000000000000000a1",
            "2000000000000000000",
        );
        assert_eq!(list.total(), 2u64.eth());
    }
}
