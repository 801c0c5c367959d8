use crate::error::{RemitError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A positive foreign-currency amount.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific
/// rules and provide type safety for pricing calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(RemitError::invalid("amount", "must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = RemitError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

/// A positive exchange rate (reference, customer, or settlement).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Rate(Decimal);

impl Rate {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(RemitError::invalid("rate", "must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = RemitError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

/// The non-negative spread added on top of the reference rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Margin(Decimal);

impl Margin {
    pub fn new(value: Decimal) -> Result<Self> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(RemitError::invalid("margin", "must not be negative"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Margin {
    type Error = RemitError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

/// Rounds a rate to 2 decimal places, half away from zero.
///
/// All pricing rounding in this crate is `MidpointAwayFromZero`
/// (round-half-up), never banker's rounding.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a local-currency amount to the nearest whole unit.
pub fn round_local(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a local-currency money value (fees, taxes) to 2 decimal places.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(RemitError::InvalidInput { field: "amount", .. })
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(RemitError::InvalidInput { field: "amount", .. })
        ));
    }

    #[test]
    fn test_rate_validation() {
        assert!(Rate::new(dec!(90.0)).is_ok());
        assert!(Rate::new(dec!(0)).is_err());
        assert!(Rate::new(dec!(-0.5)).is_err());
    }

    #[test]
    fn test_margin_allows_zero() {
        assert!(Margin::new(dec!(0)).is_ok());
        assert!(Margin::new(dec!(1.25)).is_ok());
        assert!(matches!(
            Margin::new(dec!(-0.01)),
            Err(RemitError::InvalidInput { field: "margin", .. })
        ));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_rate(dec!(91.005)), dec!(91.01));
        assert_eq!(round_rate(dec!(91.004)), dec!(91.00));
        assert_eq!(round_local(dec!(90999.5)), dec!(91000));
        assert_eq!(round_local(dec!(90999.4)), dec!(90999));
        assert_eq!(round_money(dec!(454.995)), dec!(455.00));
    }
}
