use crate::config::PricingPolicy;
use crate::domain::money::round_money;
use crate::domain::quote::TaxRules;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Percentage-of-local-amount tax tables.
///
/// The rates arrive as configuration; nothing regulatory is encoded here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatTaxRules {
    gst_rate: Decimal,
    tcs_rate: Decimal,
}

impl FlatTaxRules {
    pub fn new(gst_rate: Decimal, tcs_rate: Decimal) -> Self {
        Self { gst_rate, tcs_rate }
    }

    pub fn from_policy(policy: &PricingPolicy) -> Self {
        Self::new(policy.gst_rate, policy.tcs_rate)
    }
}

impl TaxRules for FlatTaxRules {
    fn gst(&self, local_amount: Decimal) -> Decimal {
        round_money(local_amount * self.gst_rate)
    }

    fn tcs(&self, local_amount: Decimal) -> Decimal {
        round_money(local_amount * self.tcs_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rates_apply_to_local_amount() {
        let rules = FlatTaxRules::new(dec!(0.005), dec!(0.05));
        assert_eq!(rules.gst(dec!(91000)), dec!(455.00));
        assert_eq!(rules.tcs(dec!(91000)), dec!(4550.00));
    }

    #[test]
    fn test_tax_is_rounded_to_paise() {
        let rules = FlatTaxRules::new(dec!(0.005), dec!(0.05));
        // 0.5% of 333 = 1.665, rounds half away from zero.
        assert_eq!(rules.gst(dec!(333)), dec!(1.67));
    }

    #[test]
    fn test_built_from_policy() {
        let rules = FlatTaxRules::from_policy(&PricingPolicy::default());
        assert_eq!(rules.gst(dec!(1000)), dec!(5.00));
        assert_eq!(rules.tcs(dec!(1000)), dec!(50.00));
    }
}
