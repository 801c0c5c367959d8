//! Quote calculation engine.
//!
//! Pure and deterministic: identical inputs always yield an identical
//! breakdown. Tax percentages are never encoded here; they come in
//! through the [`TaxRules`] contract.

use crate::config::FeeSchedule;
use crate::domain::money::{Amount, Margin, Rate, round_local, round_rate};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who absorbs intermediary bank fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BankChargeBearer {
    /// Sender pays; the beneficiary receives the full amount.
    Our,
    /// Beneficiary absorbs intermediary charges.
    Ben,
}

/// External tax-rule collaborator.
///
/// Implementations are pure lookups over the local amount; the engine
/// treats the returned figures as opaque.
pub trait TaxRules: Send + Sync {
    /// Conversion-service tax (GST) on the local amount.
    fn gst(&self, local_amount: Decimal) -> Decimal;
    /// Tax collected at source (TCS) on the local amount.
    fn tcs(&self, local_amount: Decimal) -> Decimal;
}

/// Validated pricing inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteInputs {
    pub reference_rate: Rate,
    pub margin: Margin,
    pub amount: Amount,
    pub bank_charge_bearer: BankChargeBearer,
    pub has_education_loan: bool,
}

impl QuoteInputs {
    /// Builds validated inputs from raw decimals, failing field-by-field.
    pub fn new(
        reference_rate: Decimal,
        margin: Decimal,
        amount: Decimal,
        bank_charge_bearer: BankChargeBearer,
        has_education_loan: bool,
    ) -> Result<Self> {
        Ok(Self {
            reference_rate: Rate::new(reference_rate)?,
            margin: Margin::new(margin)?,
            amount: Amount::new(amount)?,
            bank_charge_bearer,
            has_education_loan,
        })
    }
}

/// The priced breakdown embedded into an order and into the quote document.
///
/// Never persisted on its own; always derived from current inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub customer_rate: Decimal,
    pub local_amount: Decimal,
    pub bank_fee: Decimal,
    pub tax_on_conversion: Decimal,
    pub tax_collected_at_source: Decimal,
    pub total_payable: Decimal,
}

impl QuoteBreakdown {
    /// Recomputes only the TCS line and the total after an education-loan
    /// flag change. The rate, local amount, fee, and GST lines are left
    /// exactly as they were.
    pub fn with_education_loan(&self, has_loan: bool, tax: &dyn TaxRules) -> Self {
        let tcs = if has_loan {
            Decimal::ZERO
        } else {
            tax.tcs(self.local_amount)
        };
        Self {
            tax_collected_at_source: tcs,
            total_payable: self.local_amount + self.bank_fee + self.tax_on_conversion + tcs,
            ..*self
        }
    }
}

/// Prices a quote from validated inputs.
///
/// `customer_rate = round2(reference + margin)`, then the local amount is
/// the customer rate times the foreign amount rounded to the nearest
/// whole local unit (half away from zero).
pub fn compute_quote(
    inputs: &QuoteInputs,
    fees: &FeeSchedule,
    tax: &dyn TaxRules,
) -> QuoteBreakdown {
    let customer_rate = round_rate(inputs.reference_rate.value() + inputs.margin.value());
    price_at(
        customer_rate,
        inputs.amount,
        inputs.bank_charge_bearer,
        inputs.has_education_loan,
        fees,
        tax,
    )
}

/// Prices a quote from an explicit customer rate.
///
/// Used when the rate has been overridden and is no longer derived from
/// reference + margin.
pub fn compute_quote_at(
    customer_rate: Rate,
    amount: Amount,
    bearer: BankChargeBearer,
    has_education_loan: bool,
    fees: &FeeSchedule,
    tax: &dyn TaxRules,
) -> QuoteBreakdown {
    price_at(
        round_rate(customer_rate.value()),
        amount,
        bearer,
        has_education_loan,
        fees,
        tax,
    )
}

fn price_at(
    customer_rate: Decimal,
    amount: Amount,
    bearer: BankChargeBearer,
    has_education_loan: bool,
    fees: &FeeSchedule,
    tax: &dyn TaxRules,
) -> QuoteBreakdown {
    let local_amount = round_local(customer_rate * amount.value());
    let bank_fee = match bearer {
        BankChargeBearer::Our => fees.our,
        BankChargeBearer::Ben => fees.ben,
    };
    let tax_on_conversion = tax.gst(local_amount);
    let tax_collected_at_source = if has_education_loan {
        Decimal::ZERO
    } else {
        tax.tcs(local_amount)
    };
    QuoteBreakdown {
        customer_rate,
        local_amount,
        bank_fee,
        tax_on_conversion,
        tax_collected_at_source,
        total_payable: local_amount + bank_fee + tax_on_conversion + tax_collected_at_source,
    }
}
