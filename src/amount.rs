//! Monetary units and spend-amount resolution
//!
//! All internal accounting happens in integer smallest units ("sats").
//! Decimal coin values exist only at the system boundary: request path
//! parameters, indexer responses and response bodies.

use crate::error::WalletError;

/// Smallest units per whole coin.
pub const SATS_PER_COIN: u64 = 100_000_000;

/// Fractional digits carried by the decimal display unit.
const COIN_DECIMALS: usize = 8;

/// How the spend amount of a transaction is determined.
///
/// `Sweep` spends the entire available balance minus the flat fee;
/// `Fixed` spends exactly the given amount, with the fee left as the
/// caller's headroom to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountMode {
    Sweep,
    Fixed(u64),
}

/// Resolved spend target for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountResolution {
    pub spend_sats: u64,
    pub fee_sats: u64,
    pub is_sweep: bool,
}

/// Decides the spend amount and fee deduction for a transaction.
///
/// The fee is injected at construction so the policy is testable without
/// process-global state.
#[derive(Debug, Clone, Copy)]
pub struct AmountPolicy {
    send_fee_sats: u64,
}

impl AmountPolicy {
    pub fn new(send_fee_sats: u64) -> Self {
        Self { send_fee_sats }
    }

    /// Resolve the spend amount against the available balance.
    ///
    /// Guarantees `spend_sats + fee_sats <= available_sats` on success.
    pub fn resolve(
        &self,
        available_sats: u64,
        mode: AmountMode,
    ) -> Result<AmountResolution, WalletError> {
        match mode {
            AmountMode::Sweep => {
                let spend_sats = available_sats
                    .checked_sub(self.send_fee_sats)
                    .filter(|spend| *spend > 0)
                    .ok_or_else(|| {
                        WalletError::InsufficientBalance(format!(
                            "available {} sats does not cover the {} sats fee",
                            available_sats, self.send_fee_sats
                        ))
                    })?;

                Ok(AmountResolution {
                    spend_sats,
                    fee_sats: self.send_fee_sats,
                    is_sweep: true,
                })
            }
            AmountMode::Fixed(amount_sats) => {
                if amount_sats == 0 {
                    return Err(WalletError::InvalidAmount(
                        "amount must be positive".to_string(),
                    ));
                }

                let required = amount_sats.checked_add(self.send_fee_sats).ok_or_else(|| {
                    WalletError::InvalidAmount("amount overflows".to_string())
                })?;
                if required > available_sats {
                    return Err(WalletError::InsufficientBalance(format!(
                        "need {} sats (amount + fee), but only {} sats available",
                        required, available_sats
                    )));
                }

                Ok(AmountResolution {
                    spend_sats: amount_sats,
                    fee_sats: self.send_fee_sats,
                    is_sweep: false,
                })
            }
        }
    }
}

/// Parse a decimal coin amount (e.g. a path parameter) into smallest units.
///
/// The parse is exact fixed-point string arithmetic: digits beyond the
/// eighth fractional place are truncated, never rounded up, so a request
/// can never overspend by a fractional unit.
pub fn sats_from_decimal_str(raw: &str) -> Result<u64, WalletError> {
    let raw = raw.trim();
    let invalid = || WalletError::InvalidAmount(format!("'{}' is not a valid amount", raw));

    if raw.is_empty() || raw == "." {
        return Err(invalid());
    }

    let (whole, frac) = match raw.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (raw, ""),
    };

    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_sats = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| invalid())?
            .checked_mul(SATS_PER_COIN)
            .ok_or_else(invalid)?
    };

    // Truncate past 8 fractional digits, right-pad the rest to a sat count.
    let frac = &frac[..frac.len().min(COIN_DECIMALS)];
    let frac_sats = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = COIN_DECIMALS);
        padded.parse::<u64>().map_err(|_| invalid())?
    };

    whole_sats.checked_add(frac_sats).ok_or_else(invalid)
}

/// Convert a decimal coin value received as a JSON number into smallest
/// units, rounding to the nearest sat.
///
/// JSON numbers arrive as f64, so the conversion happens once, immediately
/// at the boundary; everything downstream is integer arithmetic.
pub fn sats_from_decimal(value: f64) -> Result<u64, WalletError> {
    if !value.is_finite() || value < 0.0 {
        return Err(WalletError::InvalidAmount(format!(
            "'{}' is not a valid amount",
            value
        )));
    }

    let sats = (value * SATS_PER_COIN as f64).round();
    // Past 2^53 an f64 no longer represents integers exactly.
    if sats >= 9_007_199_254_740_992.0 {
        return Err(WalletError::InvalidAmount(format!(
            "'{}' is too large",
            value
        )));
    }

    Ok(sats as u64)
}

/// Format smallest units as a decimal coin value for a response body.
pub fn decimal_from_sats(sats: u64) -> f64 {
    sats as f64 / SATS_PER_COIN as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(sats_from_decimal_str("1").unwrap(), 100_000_000);
        assert_eq!(sats_from_decimal_str("0.5").unwrap(), 50_000_000);
        assert_eq!(sats_from_decimal_str("1.00000001").unwrap(), 100_000_001);
        assert_eq!(sats_from_decimal_str(".25").unwrap(), 25_000_000);
        assert_eq!(sats_from_decimal_str("2.").unwrap(), 200_000_000);
    }

    #[test]
    fn truncates_past_eight_decimals() {
        // Truncation, not rounding: the ninth digit must not bump the sat count.
        assert_eq!(sats_from_decimal_str("0.123456789").unwrap(), 12_345_678);
        assert_eq!(sats_from_decimal_str("0.999999999").unwrap(), 99_999_999);
    }

    #[test]
    fn rejects_malformed_amounts() {
        for raw in ["", ".", "-1", "1.2.3", "abc", "1e8", " 1 2"] {
            assert!(
                matches!(sats_from_decimal_str(raw), Err(WalletError::InvalidAmount(_))),
                "expected InvalidAmount for '{}'",
                raw
            );
        }
    }

    #[test]
    fn converts_json_numbers_to_sats() {
        assert_eq!(sats_from_decimal(1.0).unwrap(), 100_000_000);
        assert_eq!(sats_from_decimal(0.0000553).unwrap(), 5_530);
        assert_eq!(sats_from_decimal(0.0).unwrap(), 0);
        assert!(sats_from_decimal(-0.1).is_err());
        assert!(sats_from_decimal(f64::NAN).is_err());
    }

    #[test]
    fn sweep_deducts_the_fee() {
        let policy = AmountPolicy::new(2_000);
        let resolution = policy.resolve(100_000_000, AmountMode::Sweep).unwrap();
        assert_eq!(resolution.spend_sats, 99_998_000);
        assert_eq!(resolution.fee_sats, 2_000);
        assert!(resolution.is_sweep);
    }

    #[test]
    fn sweep_fails_when_fee_consumes_balance() {
        let policy = AmountPolicy::new(2_000);
        for available in [0, 1_999, 2_000] {
            assert!(matches!(
                policy.resolve(available, AmountMode::Sweep),
                Err(WalletError::InsufficientBalance(_))
            ));
        }
    }

    #[test]
    fn fixed_amount_keeps_fee_separate() {
        let policy = AmountPolicy::new(2_000);
        let resolution = policy
            .resolve(100_000_000, AmountMode::Fixed(50_000_000))
            .unwrap();
        assert_eq!(resolution.spend_sats, 50_000_000);
        assert_eq!(resolution.fee_sats, 2_000);
        assert!(!resolution.is_sweep);
    }

    #[test]
    fn fixed_amount_requires_fee_headroom() {
        let policy = AmountPolicy::new(2_000);
        // Amount alone fits, amount + fee does not.
        assert!(matches!(
            policy.resolve(50_001_000, AmountMode::Fixed(50_000_000)),
            Err(WalletError::InsufficientBalance(_))
        ));
    }

    #[test]
    fn fixed_amount_rejects_zero() {
        let policy = AmountPolicy::new(2_000);
        assert!(matches!(
            policy.resolve(100_000_000, AmountMode::Fixed(0)),
            Err(WalletError::InvalidAmount(_))
        ));
    }
}
