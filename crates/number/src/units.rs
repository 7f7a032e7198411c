use alloy::primitives::{
    U256,
    utils::{self, UnitsError},
};

#[cfg(any(test, feature = "test-util"))]
pub trait EthUnit: std::marker::Sized {
    /// Returns the current Eth amount as wei (i.e. 1e18 wei).
    fn eth(self) -> U256;
}

#[cfg(any(test, feature = "test-util"))]
impl EthUnit for u64 {
    fn eth(self) -> U256 {
        U256::from(self) * utils::Unit::ETHER.wei()
    }
}

/// Renders an amount of the smallest token unit as a decimal number of whole
/// tokens, i.e. `amount / 10^decimals`.
///
/// The result is exact and trailing zeros of the fractional part are dropped
/// (`1500000` with 6 decimals is `"1.5"`). Fails for more than 77 decimals.
pub fn format_units(amount: U256, decimals: u8) -> Result<String, UnitsError> {
    let formatted = utils::format_units(amount, decimals)?;
    Ok(match formatted.split_once('.') {
        Some((integer, fraction)) => match fraction.trim_end_matches('0') {
            "" => integer.to_string(),
            fraction => format!("{integer}.{fraction}"),
        },
        None => formatted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_tokens() {
        assert_eq!(format_units(1u64.eth(), 18).unwrap(), "1");
        assert_eq!(format_units(1_000u64.eth(), 18).unwrap(), "1000");
        assert_eq!(format_units(U256::ZERO, 18).unwrap(), "0");
    }

    #[test]
    fn formats_fractions() {
        assert_eq!(format_units(U256::from(1_500_000), 6).unwrap(), "1.5");
        assert_eq!(
            format_units(U256::from(1), 18).unwrap(),
            "0.000000000000000001"
        );
        assert_eq!(format_units(U256::from(123_456), 3).unwrap(), "123.456");
        assert_eq!(format_units(U256::from(1_050), 2).unwrap(), "10.5");
    }

    #[test]
    fn zero_decimals_is_identity() {
        assert_eq!(format_units(U256::from(42), 0).unwrap(), "42");
        assert_eq!(format_units(U256::from(100), 0).unwrap(), "100");
    }

    #[test]
    fn rejects_too_many_decimals() {
        assert!(format_units(U256::from(25), 77).is_ok());
        assert!(format_units(U256::from(25), 78).is_err());
    }
}
