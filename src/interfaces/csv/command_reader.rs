use crate::domain::order::Purpose;
use crate::domain::quote::BankChargeBearer;
use crate::domain::sender::PayerRelation;
use crate::domain::status::OrderStatus;
use crate::error::{RemitError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One workflow command in a replay file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandOp {
    /// Price a new order under the row's alias.
    Quote,
    /// Generate and download the quote document.
    Download,
    /// Collect and link the sender.
    Sender,
    /// Create (or select) and link the beneficiary.
    Beneficiary,
    /// Submit the document set.
    Docs,
    Authorize,
    /// Direct staff status edit.
    Status,
    /// Rate override.
    Override,
    /// Toggle the education-loan flag.
    Loan,
    /// Resolve the rate popup as blocked.
    Block,
    /// Recompute pricing with any changed inputs.
    Reprice,
}

/// A row of the workflow-command CSV. The `order` column is a file-local
/// alias; the id assigned at creation is mapped back to it on output.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRow {
    pub op: CommandOp,
    pub order: String,
    pub purpose: Option<Purpose>,
    pub country: Option<String>,
    pub amount: Option<Decimal>,
    pub ibr: Option<Decimal>,
    pub margin: Option<Decimal>,
    pub bearer: Option<BankChargeBearer>,
    pub loan: Option<bool>,
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub relation: Option<PayerRelation>,
    pub email: Option<String>,
    pub payer_name: Option<String>,
    pub payer_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub customer_rate: Option<Decimal>,
    pub settlement_rate: Option<Decimal>,
    pub bank: Option<String>,
    pub bank_code: Option<String>,
    pub account: Option<String>,
}

impl CommandRow {
    pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T> {
        value.ok_or_else(|| RemitError::invalid(field, "required for this command"))
    }
}

/// Reads workflow commands from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record
/// lengths, yielding commands lazily so large replay files stream.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<CommandRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RemitError::from))
    }
}
