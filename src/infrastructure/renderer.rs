use crate::domain::ports::{DocumentHandle, QuoteDocumentInput, QuoteDocumentRenderer};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Renders quote documents as plain text and keeps them addressable by
/// handle. The layout here is illustrative; production rendering is an
/// external collaborator reached through the same port.
#[derive(Default, Clone)]
pub struct TextQuoteRenderer {
    documents: Arc<RwLock<HashMap<Uuid, String>>>,
}

impl TextQuoteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches a rendered document by handle id.
    pub async fn document(&self, id: Uuid) -> Option<String> {
        let documents = self.documents.read().await;
        documents.get(&id).cloned()
    }
}

#[async_trait]
impl QuoteDocumentRenderer for TextQuoteRenderer {
    async fn render(&self, input: &QuoteDocumentInput) -> Result<DocumentHandle> {
        let body = format!(
            "FOREX REMITTANCE QUOTE\n\
             generated: {generated}\n\
             student: {student}\n\
             destination: {country}\n\
             purpose: {purpose:?}\n\
             amount: {currency} {amount}\n\
             customer rate: {rate}\n\
             --------------------------------\n\
             local amount:            {local}\n\
             bank fee:                {fee}\n\
             tax on conversion:       {gst}\n\
             tax collected at source: {tcs}\n\
             --------------------------------\n\
             TOTAL PAYABLE:           {total}\n\
             \n\
             settle to: {partner} / {partner_bank}\n\
             swift: {swift}  account: {account}\n\
             upload documents: {upload}\n",
            generated = input.generated_at.to_rfc3339(),
            student = input.student_name,
            country = input.destination_country,
            purpose = input.purpose,
            currency = input.currency,
            amount = input.amount,
            rate = input.customer_rate,
            local = input.local_amount,
            fee = input.bank_fee,
            gst = input.tax_on_conversion,
            tcs = input.tax_collected_at_source,
            total = input.total_payable,
            partner = input.partner.name,
            partner_bank = input.partner.bank_name,
            swift = input.partner.swift,
            account = input.partner.account_number,
            upload = input.upload_link,
        );
        let id = Uuid::new_v4();
        let mut documents = self.documents.write().await;
        documents.insert(id, body);
        Ok(DocumentHandle {
            id,
            location: format!("memory://quotes/{id}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Purpose;
    use crate::domain::ports::ForexPartner;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_document_carries_required_fields() {
        let renderer = TextQuoteRenderer::new();
        let order_id = Uuid::new_v4();
        let input = QuoteDocumentInput {
            generated_at: Utc::now(),
            order_id,
            student_name: "Asha Rao".to_string(),
            destination_country: "US".to_string(),
            purpose: Purpose::UniversityFees,
            currency: "USD".to_string(),
            amount: dec!(1000),
            customer_rate: dec!(91.00),
            local_amount: dec!(91000),
            bank_fee: dec!(1500),
            tax_on_conversion: dec!(455.00),
            tax_collected_at_source: dec!(4550.00),
            total_payable: dec!(97505.00),
            partner: ForexPartner::default(),
            upload_link: format!("https://uploads.test/orders/{order_id}"),
        };

        let handle = renderer.render(&input).await.unwrap();
        let body = renderer.document(handle.id).await.unwrap();
        for needle in [
            "Asha Rao",
            "US",
            "91.00",
            "91000",
            "1500",
            "455.00",
            "4550.00",
            "97505.00",
            "AXISINBB",
            &format!("orders/{order_id}"),
        ] {
            assert!(body.contains(needle), "document missing {needle}");
        }
    }
}
