//! Collaborator contracts consumed by the core.
//!
//! Persistence and document generation live behind these ports; the core
//! never reads or writes records any other way. Store writes are
//! last-write-wins: two staff sessions editing the same order race, and
//! the later write stands.

use crate::domain::beneficiary::Beneficiary;
use crate::domain::order::{Order, Purpose};
use crate::domain::sender::Sender;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(&self, order: Order) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Order>>;
    async fn update(&self, order: Order) -> Result<()>;
    async fn all(&self) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait SenderStore: Send + Sync {
    async fn create(&self, sender: Sender) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Sender>>;
    async fn update(&self, sender: Sender) -> Result<()>;
}

#[async_trait]
pub trait BeneficiaryStore: Send + Sync {
    async fn create(&self, beneficiary: Beneficiary) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Beneficiary>>;
    async fn update(&self, beneficiary: Beneficiary) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list_active(&self) -> Result<Vec<Beneficiary>>;
}

/// Settlement institution whose bank details appear on quote documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexPartner {
    pub name: String,
    pub bank_name: String,
    pub swift: String,
    pub account_number: String,
}

impl Default for ForexPartner {
    fn default() -> Self {
        Self {
            name: "Nivaan Forex Services".to_string(),
            bank_name: "Axis Bank, Fort Branch".to_string(),
            swift: "AXISINBB".to_string(),
            account_number: "920020034512345".to_string(),
        }
    }
}

/// Everything a generated quote document must carry. The textual layout
/// is the renderer's concern; the core only supplies the fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocumentInput {
    pub generated_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub student_name: String,
    pub destination_country: String,
    pub purpose: Purpose,
    pub currency: String,
    pub amount: Decimal,
    pub customer_rate: Decimal,
    pub local_amount: Decimal,
    pub bank_fee: Decimal,
    pub tax_on_conversion: Decimal,
    pub tax_collected_at_source: Decimal,
    pub total_payable: Decimal,
    pub partner: ForexPartner,
    /// Order-scoped link the sender uses to upload supporting documents.
    pub upload_link: String,
}

/// Opaque handle to a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub id: Uuid,
    pub location: String,
}

#[async_trait]
pub trait QuoteDocumentRenderer: Send + Sync {
    async fn render(&self, input: &QuoteDocumentInput) -> Result<DocumentHandle>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type SenderStoreBox = Box<dyn SenderStore>;
pub type BeneficiaryStoreBox = Box<dyn BeneficiaryStore>;
pub type QuoteDocumentRendererBox = Box<dyn QuoteDocumentRenderer>;
