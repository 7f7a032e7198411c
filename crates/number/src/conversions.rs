use alloy::primitives::U256;

/// Parses an unsigned base-10 integer. Signs, separators, fractions and hex
/// prefixes are rejected, as are values that do not fit into 256 bits.
pub fn parse_decimal_u256(input: &str) -> Option<U256> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(input, 10).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_integers() {
        assert_eq!(parse_decimal_u256("0"), Some(U256::ZERO));
        assert_eq!(parse_decimal_u256("300"), Some(U256::from(300)));
        assert_eq!(
            parse_decimal_u256("1000000000000000000"),
            Some(U256::from(10u64.pow(18)))
        );
        assert_eq!(parse_decimal_u256(&U256::MAX.to_string()), Some(U256::MAX));
    }

    #[test]
    fn rejects_everything_else() {
        for input in ["", "abc", "-1", "+1", "1.5", "0x10", "1_000", " 1", "1e18"] {
            assert_eq!(parse_decimal_u256(input), None, "{input:?}");
        }
        // One more than `U256::MAX`.
        let overflow = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(parse_decimal_u256(overflow), None);
    }
}
