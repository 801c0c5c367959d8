use crate::error::{RemitError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Relationship of the person funding the remittance to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayerRelation {
    /// The student pays for themselves. No separate payer block is
    /// collected; the student contact fields double as payer contact.
    #[serde(rename = "Self")]
    Self_,
    Parent,
    Guardian,
    Sibling,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residency {
    Resident,
    NonResident,
}

/// Declared origin of the remitted funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundsSource {
    Savings,
    EducationLoan,
    GiftFromRelative,
    PropertySale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Identity, address, and funds-source block for a payer who is not the
/// student. Collected in full when the relation is anything but `Self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerDetails {
    pub full_name: String,
    pub id_number: String,
    pub contact: ContactDetails,
    pub funds_source: FundsSource,
}

/// The person remitting funds. Always created in the context of an order,
/// though historical senders can be looked up and reused across orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub id: Uuid,
    pub order_id: Uuid,
    pub student_name: String,
    /// Student identity document number. Not required when the student
    /// pays for themselves.
    pub student_id_number: Option<String>,
    pub payer: PayerRelation,
    pub contact: ContactDetails,
    pub residency: Residency,
    pub payer_block: Option<PayerDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields collected by the sender step of the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderDraft {
    pub student_name: String,
    pub student_id_number: Option<String>,
    pub payer: PayerRelation,
    pub contact: ContactDetails,
    pub residency: Residency,
    pub payer_block: Option<PayerDetails>,
}

impl SenderDraft {
    /// Field-scoped validation with the payer branching rule: a
    /// self-paying student needs no identity documents and no payer
    /// block; any other relation requires both.
    pub fn validate(&self) -> Result<()> {
        if self.student_name.trim().is_empty() {
            return Err(RemitError::invalid("studentName", "must not be empty"));
        }
        if self.contact.email.trim().is_empty() {
            return Err(RemitError::invalid("email", "must not be empty"));
        }
        if self.payer != PayerRelation::Self_ {
            if self.student_id_number.as_deref().unwrap_or("").trim().is_empty() {
                return Err(RemitError::invalid(
                    "studentIdNumber",
                    "required when the payer is not the student",
                ));
            }
            match &self.payer_block {
                None => {
                    return Err(RemitError::invalid(
                        "payerBlock",
                        "required when the payer is not the student",
                    ));
                }
                Some(block) if block.full_name.trim().is_empty() => {
                    return Err(RemitError::invalid("payerBlock.fullName", "must not be empty"));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn into_sender(self, id: Uuid, order_id: Uuid) -> Sender {
        let now = Utc::now();
        Sender {
            id,
            order_id,
            student_name: self.student_name,
            student_id_number: self.student_id_number,
            payer: self.payer,
            contact: self.contact,
            residency: self.residency,
            payer_block: self.payer_block,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Sender {
    /// Applies a fresh draft in place; re-entering the sender step for the
    /// same order edits this record rather than creating a second one.
    pub fn apply(&mut self, draft: SenderDraft) {
        self.student_name = draft.student_name;
        self.student_id_number = draft.student_id_number;
        self.payer = draft.payer;
        self.contact = draft.contact;
        self.residency = draft.residency;
        self.payer_block = draft.payer_block;
        self.updated_at = Utc::now();
    }
}
