use crate::config::FeeSchedule;
use crate::domain::beneficiary::currency_for_country;
use crate::domain::money::{Amount, Margin, Rate};
use crate::domain::quote::{
    BankChargeBearer, QuoteBreakdown, QuoteInputs, TaxRules, compute_quote, compute_quote_at,
};
use crate::domain::status::{self, EditOutcome, OrderStatus, StatusTrigger};
use crate::error::{RemitError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why the money is being remitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    UniversityFees,
    LivingExpenses,
    /// German-style visa blocked account; defaults the destination to
    /// DE/EUR when not given explicitly.
    BlockedAccount,
    ExamFees,
    Other,
}

/// The central entity: a priced remittance order moving through the
/// review-and-authorization lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub student_name: String,
    pub purpose: Purpose,
    pub destination_country: String,
    /// ISO currency, derived from the destination country unless
    /// overridden at creation.
    pub currency: String,
    pub amount: Amount,
    /// The interbank ("IBR") rate the quote was priced from.
    pub reference_rate: Rate,
    pub margin: Margin,
    pub bank_charge_bearer: BankChargeBearer,
    pub has_education_loan: bool,
    /// Derived pricing lines; only ever written by a recompute.
    #[serde(flatten)]
    pub pricing: QuoteBreakdown,
    /// Partner settlement rate, present only after an override.
    pub settlement_rate: Option<Rate>,
    pub status: OrderStatus,
    pub fx_rate_overridden: bool,
    pub sender_id: Option<Uuid>,
    pub beneficiary_id: Option<Uuid>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields collected when a staff member first prices a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub student_name: String,
    pub purpose: Purpose,
    pub destination_country: Option<String>,
    pub currency: Option<String>,
    pub amount: Decimal,
    pub reference_rate: Decimal,
    pub margin: Decimal,
    pub bank_charge_bearer: BankChargeBearer,
    pub has_education_loan: bool,
    pub created_by: String,
}

impl Order {
    /// Prices a new order from a draft. The order starts in `Received`;
    /// a quote exists but no document has been generated yet.
    pub fn price(draft: OrderDraft, fees: &FeeSchedule, tax: &dyn TaxRules) -> Result<Self> {
        if draft.student_name.trim().is_empty() {
            return Err(RemitError::invalid("studentName", "must not be empty"));
        }
        let destination_country = match (&draft.destination_country, draft.purpose) {
            (Some(c), _) => c.clone(),
            (None, Purpose::BlockedAccount) => "DE".to_string(),
            (None, _) => {
                return Err(RemitError::invalid("destinationCountry", "must be given"));
            }
        };
        let currency = match draft.currency {
            Some(c) => c,
            None => currency_for_country(&destination_country)
                .ok_or_else(|| {
                    RemitError::invalid(
                        "currency",
                        format!("no default currency for {destination_country}"),
                    )
                })?
                .to_string(),
        };
        let inputs = QuoteInputs::new(
            draft.reference_rate,
            draft.margin,
            draft.amount,
            draft.bank_charge_bearer,
            draft.has_education_loan,
        )?;
        let pricing = compute_quote(&inputs, fees, tax);
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            student_name: draft.student_name,
            purpose: draft.purpose,
            destination_country,
            currency,
            amount: inputs.amount,
            reference_rate: inputs.reference_rate,
            margin: inputs.margin,
            bank_charge_bearer: inputs.bank_charge_bearer,
            has_education_loan: inputs.has_education_loan,
            pricing,
            settlement_rate: None,
            status: OrderStatus::Received,
            fx_rate_overridden: false,
            sender_id: None,
            beneficiary_id: None,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if matches!(self.status, OrderStatus::Authorized | OrderStatus::Completed) {
            return Err(RemitError::LockedOrder {
                id: self.id,
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Recomputes the pricing lines from fresh inputs. Allowed until the
    /// order reaches an authorization-locked status.
    pub fn reprice(
        &mut self,
        inputs: QuoteInputs,
        fees: &FeeSchedule,
        tax: &dyn TaxRules,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.pricing = compute_quote(&inputs, fees, tax);
        self.amount = inputs.amount;
        self.reference_rate = inputs.reference_rate;
        self.margin = inputs.margin;
        self.bank_charge_bearer = inputs.bank_charge_bearer;
        self.has_education_loan = inputs.has_education_loan;
        self.touch();
        Ok(())
    }

    /// Flips the education-loan flag, recomputing only the TCS line and
    /// the total. The other pricing lines are untouched.
    pub fn set_education_loan(&mut self, has_loan: bool, tax: &dyn TaxRules) -> Result<()> {
        self.ensure_unlocked()?;
        if self.has_education_loan != has_loan {
            self.has_education_loan = has_loan;
            self.pricing = self.pricing.with_education_loan(has_loan, tax);
            self.touch();
        }
        Ok(())
    }

    /// Replaces the priced rates after the fact, marking the order as
    /// overridden and recomputing from the new customer rate. The margin
    /// is re-derived as customer minus reference.
    pub fn override_rate(
        &mut self,
        new_ibr: Rate,
        new_customer: Rate,
        new_settlement: Rate,
        fees: &FeeSchedule,
        tax: &dyn TaxRules,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        let margin = Margin::new(new_customer.value() - new_ibr.value()).map_err(|_| {
            RemitError::invalid("customerRate", "must not be below the reference rate")
        })?;
        self.reference_rate = new_ibr;
        self.margin = margin;
        self.settlement_rate = Some(new_settlement);
        self.fx_rate_overridden = true;
        self.pricing = compute_quote_at(
            new_customer,
            self.amount,
            self.bank_charge_bearer,
            self.has_education_loan,
            fees,
            tax,
        );
        self.touch();
        Ok(())
    }

    pub fn link_sender(&mut self, sender_id: Uuid) {
        self.sender_id = Some(sender_id);
        self.touch();
    }

    /// A beneficiary may only be linked once a sender is.
    pub fn link_beneficiary(&mut self, beneficiary_id: Uuid) -> Result<()> {
        if self.sender_id.is_none() {
            return Err(RemitError::invalid(
                "beneficiaryId",
                "a sender must be linked first",
            ));
        }
        self.beneficiary_id = Some(beneficiary_id);
        self.touch();
        Ok(())
    }

    /// Applies a trigger-forced status transition.
    pub fn apply_trigger(&mut self, trigger: StatusTrigger) -> Result<()> {
        match status::apply_trigger(self.status, trigger) {
            Ok(next) => {
                self.status = next;
                self.touch();
                Ok(())
            }
            Err(_refused) => Err(RemitError::LockedOrder {
                id: self.id,
                status: self.status.to_string(),
            }),
        }
    }

    /// Applies a direct staff status edit; locked targets and terminal
    /// orders leave the status as-is.
    pub fn set_status_directly(&mut self, requested: OrderStatus) -> EditOutcome {
        let outcome = status::set_directly(self.status, requested);
        if let EditOutcome::Applied(next) = outcome {
            self.status = next;
            self.touch();
        }
        outcome
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
