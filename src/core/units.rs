//! Fixed-point unit conversion and share-price arithmetic
//!
//! Everything in this module is pure integer math over 10^18-scaled values.
//! Floating point is never used for storage, comparison, or anything that
//! feeds back into an on-chain amount; the only lossy step is the optional
//! [`DisplayAmount::to_f64`] at the very end of the display pipeline, and
//! that value is one-way.
//!
//! Products of two 256-bit values go through a 512-bit intermediate so that
//! `shares * share_price` never overflows before the truncating division.

use primitive_types::{U256, U512};
use rust_decimal::Decimal;

use crate::core::types::{Amount, SharePrice, Shares};
use crate::units::{DECIMALS, SHANNONS_PER_AI3, TOKEN_SYMBOL};

/// Narrow a 512-bit value back to 256 bits, if it fits
fn u512_to_u256(value: U512) -> Option<U256> {
    let limbs = value.0;
    if limbs[4..].iter().any(|&w| w != 0) {
        return None;
    }
    Some(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

fn shannons_per_ai3_wide() -> U512 {
    U512::from(SHANNONS_PER_AI3)
}

/// Compute `floor(shares * share_price / 10^18)`.
///
/// Truncating division, never rounding up: a nominator is never credited
/// more than the pool owes. The full 512-bit product is taken first, so the
/// result is exact for any realistic stake.
pub fn mul_shares_by_price(shares: Shares, price: SharePrice) -> Amount {
    let product = shares.into_inner().full_mul(price.into_inner());
    let quotient = product / shannons_per_ai3_wide();

    // A quotient above 2^256 would need a stake beyond total token issuance;
    // the zero amount is the conservative answer if it ever happens.
    u512_to_u256(quotient).map_or(Amount::ZERO, Amount::new)
}

/// String-input variant of [`mul_shares_by_price`].
///
/// Malformed integer strings yield [`Amount::ZERO`] instead of an error.
/// That safe default keeps display code from faulting on garbage wire data,
/// but callers must not lean on it for validation; validation happens
/// upstream of this layer.
pub fn mul_shares_by_price_str(shares: &str, price: &str) -> Amount {
    let (Ok(shares), Ok(price)) = (
        U256::from_dec_str(shares.trim()),
        U256::from_dec_str(price.trim()),
    ) else {
        tracing::debug!(shares, price, "malformed integer input, defaulting to zero");
        return Amount::ZERO;
    };

    mul_shares_by_price(Shares::new(shares), SharePrice::new(price))
}

/// Derive an operator's share price: `floor(total_stake * 10^18 / total_shares)`.
///
/// Returns `None` when the pool has no shares; callers decide whether to
/// substitute an explicitly supplied price or value the position at zero.
pub fn share_price(total_stake: Amount, total_shares: Shares) -> Option<SharePrice> {
    if total_shares.is_zero() {
        return None;
    }

    let scaled = total_stake.into_inner().full_mul(SHANNONS_PER_AI3);
    let quotient = scaled / U512::from(total_shares.into_inner());
    u512_to_u256(quotient).map(SharePrice::new)
}

/// An amount split at the whole-token boundary, ready for formatting
///
/// The integer part keeps full 256-bit width; only the fractional remainder
/// (bounded to `[0, 10^18)`) is narrow enough for a `u64`. This is what lets
/// large balances format exactly where a single float conversion would have
/// lost precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayAmount {
    /// Whole AI3 tokens
    pub integer: U256,
    /// Remaining shannons, always less than 10^18
    pub fractional_shannons: u64,
}

impl DisplayAmount {
    /// Format with a fixed number of fractional digits, truncating
    ///
    /// Truncation, not rounding: `1.23456` at four places is `"1.2345"`.
    pub fn format(&self, places: u32) -> String {
        if places == 0 {
            return self.integer.to_string();
        }

        let places = places.min(DECIMALS);
        let frac = format!("{:018}", self.fractional_shannons);
        format!("{}.{}", self.integer, &frac[..places as usize])
    }

    /// Format with the token symbol appended, e.g. `"20.0000 AI3"`
    pub fn format_with_symbol(&self, places: u32) -> String {
        format!("{} {}", self.format(places), TOKEN_SYMBOL)
    }

    /// Approximate floating value for charts and sliders.
    ///
    /// One-way by design: display values are never fed back into arithmetic.
    pub fn to_f64(&self) -> f64 {
        let integer = self.integer.to_string().parse::<f64>().unwrap_or(f64::MAX);
        integer + self.fractional_shannons as f64 / 1e18
    }
}

/// Split a shannon amount into whole tokens and a bounded fractional part
///
/// Integer division and modulo only; no precision loss at any magnitude.
pub fn shannon_to_display(amount: Amount) -> DisplayAmount {
    let (integer, remainder) = amount.into_inner().div_mod(SHANNONS_PER_AI3);

    DisplayAmount {
        integer,
        // remainder < 10^18, comfortably inside u64
        fractional_shannons: remainder.low_u64(),
    }
}

/// Convert a display-unit decimal back to shannons, truncating sub-shannon digits
///
/// Exact mantissa/scale integer conversion; fractional shannons are floored,
/// never rounded up, so conversion can never manufacture value. Negative
/// input yields [`Amount::ZERO`] (balances are non-negative).
pub fn display_to_shannon(ai3: Decimal) -> Amount {
    if ai3.is_sign_negative() {
        return Amount::ZERO;
    }

    let mantissa = ai3.mantissa().unsigned_abs();
    let scale = ai3.scale();
    let mantissa = U256::from(mantissa);

    let shannons = if scale <= DECIMALS {
        mantissa * U256::exp10((DECIMALS - scale) as usize)
    } else {
        mantissa / U256::exp10((scale - DECIMALS) as usize)
    };

    Amount::new(shannons)
}

/// Parse a display-unit decimal string (e.g. `"1.25"`) into shannons
///
/// Same safe-default policy as [`mul_shares_by_price_str`]: malformed input
/// yields the zero amount.
pub fn display_str_to_shannon(ai3: &str) -> Amount {
    match ai3.trim().parse::<Decimal>() {
        Ok(value) => display_to_shannon(value),
        Err(_) => {
            tracing::debug!(input = ai3, "malformed decimal input, defaulting to zero");
            Amount::ZERO
        }
    }
}

/// Convenience: shannons straight to a fixed-place display string
pub fn format_ai3(amount: Amount, places: u32) -> String {
    shannon_to_display(amount).format_with_symbol(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount(dec: &str) -> Amount {
        Amount::from_dec_str(dec).unwrap()
    }

    #[test]
    fn test_wide_divisor_matches_constant() {
        assert_eq!(shannons_per_ai3_wide(), U512::from(U256::exp10(18)));
    }

    #[test]
    fn test_mul_shares_by_price_small() {
        // 3 shares at 1.5 AI3 each
        let shares = Shares::from_u64(3);
        let price = SharePrice::new(U256::from(1_500_000_000_000_000_000_u64));
        assert_eq!(mul_shares_by_price(shares, price), Amount::from_u64(4));

        // floor, never round: 1 share at 0.9999... per share
        let shares = Shares::from_u64(1);
        let price = SharePrice::new(U256::from(999_999_999_999_999_999_u64));
        assert_eq!(mul_shares_by_price(shares, price), Amount::ZERO);
    }

    #[test]
    fn test_mul_shares_by_price_beyond_f64() {
        // 10^9 AI3 worth of shares at price 2.0: floats above 2^53 would
        // silently drop low bits here, the integer path must not.
        let shares = Shares::from_dec_str("1000000000000000000000000001").unwrap();
        let price = SharePrice::new(U256::from(2_000_000_000_000_000_000_u64));
        assert_eq!(
            mul_shares_by_price(shares, price),
            amount("2000000000000000000000000002")
        );
    }

    #[test]
    fn test_mul_shares_by_price_str_safe_default() {
        assert_eq!(
            mul_shares_by_price_str("1000000000000000000", "2000000000000000000"),
            amount("2000000000000000000")
        );
        assert_eq!(mul_shares_by_price_str("garbage", "1"), Amount::ZERO);
        assert_eq!(mul_shares_by_price_str("1", "1.5"), Amount::ZERO);
        assert_eq!(mul_shares_by_price_str("", ""), Amount::ZERO);
    }

    #[test]
    fn test_share_price_derivation() {
        // 1000 AI3 staked over 500e18 shares => 2.0 per share
        let price = share_price(
            amount("1000000000000000000000"),
            Shares::from_dec_str("500000000000000000000").unwrap(),
        )
        .unwrap();
        assert_eq!(price.into_inner(), U256::from(2_000_000_000_000_000_000_u64));

        assert_eq!(share_price(amount("1000"), Shares::ZERO), None);
    }

    #[test]
    fn test_end_to_end_position_value() {
        let price = share_price(
            amount("1000000000000000000000"),
            Shares::from_dec_str("500000000000000000000").unwrap(),
        )
        .unwrap();
        let value = mul_shares_by_price(
            Shares::from_dec_str("10000000000000000000").unwrap(),
            price,
        );

        assert_eq!(value, amount("20000000000000000000"));
        assert_eq!(format_ai3(value, 4), "20.0000 AI3");
    }

    #[test]
    fn test_shannon_to_display_split() {
        let display = shannon_to_display(amount("1234560000000000000"));
        assert_eq!(display.integer, U256::from(1));
        assert_eq!(display.fractional_shannons, 234_560_000_000_000_000);
        // truncated, not rounded
        assert_eq!(display.format(4), "1.2345");
        assert_eq!(display.format(0), "1");
        assert_eq!(display.format_with_symbol(6), "1.234560 AI3");
    }

    #[test]
    fn test_shannon_to_display_large_balance() {
        // 12_345_678_901 AI3 and change; exact where f64 would not be
        let display = shannon_to_display(amount("12345678901000000000000000001"));
        assert_eq!(display.integer, U256::from(12_345_678_901_u64));
        assert_eq!(display.fractional_shannons, 1);
    }

    #[test]
    fn test_display_to_shannon() {
        assert_eq!(display_to_shannon(dec!(1.5)), amount("1500000000000000000"));
        assert_eq!(display_to_shannon(dec!(0)), Amount::ZERO);
        assert_eq!(
            display_to_shannon(dec!(20)),
            amount("20000000000000000000")
        );
        // sub-shannon digits truncate toward zero
        assert_eq!(
            display_to_shannon(dec!(0.0000000000000000019)),
            Amount::from_u64(1)
        );
        // negative input floors at zero
        assert_eq!(display_to_shannon(dec!(-3)), Amount::ZERO);
    }

    #[test]
    fn test_display_str_to_shannon_safe_default() {
        assert_eq!(
            display_str_to_shannon("1.2345"),
            amount("1234500000000000000")
        );
        assert_eq!(display_str_to_shannon("not-a-number"), Amount::ZERO);
    }

    #[test]
    fn test_round_trip_within_display_precision() {
        let original = amount("1234560000000000000");
        let formatted = shannon_to_display(original).format(4);
        let back = display_str_to_shannon(&formatted);

        // Lossy beyond 4 places by design; exact up to them
        assert_eq!(back, amount("1234500000000000000"));
        assert!(back <= original);
        assert!(original.saturating_sub(back) < Amount::from_u64(100_000_000_000_000));
    }

    proptest! {
        #[test]
        fn prop_floor_multiply_matches_u128_reference(shares in any::<u64>(), price in any::<u64>()) {
            let expected = (shares as u128 * price as u128) / 1_000_000_000_000_000_000_u128;
            let got = mul_shares_by_price(
                Shares::from_u64(shares),
                SharePrice::new(U256::from(price)),
            );
            prop_assert_eq!(got.into_inner(), U256::from(expected));
        }

        #[test]
        fn prop_display_round_trip_never_gains_value(raw in any::<u128>()) {
            let original = Amount::from_u128(raw);
            let formatted = shannon_to_display(original).format(6);
            let back = display_str_to_shannon(&formatted);
            prop_assert!(back <= original);
        }
    }
}
