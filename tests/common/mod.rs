use remitdesk::application::orchestrator::{DeskPolicy, RemitDesk};
use remitdesk::config::FeeSchedule;
use remitdesk::domain::beneficiary::{BankRoute, BeneficiaryDraft};
use remitdesk::domain::order::{OrderDraft, Purpose};
use remitdesk::domain::ports::{
    BeneficiaryStoreBox, ForexPartner, OrderStoreBox, QuoteDocumentRendererBox, SenderStoreBox,
};
use remitdesk::domain::quote::BankChargeBearer;
use remitdesk::domain::sender::{ContactDetails, PayerRelation, Residency, SenderDraft};
use remitdesk::infrastructure::in_memory::{
    InMemoryBeneficiaryStore, InMemoryOrderStore, InMemorySenderStore,
};
use remitdesk::infrastructure::renderer::TextQuoteRenderer;
use remitdesk::infrastructure::tax::FlatTaxRules;
use rust_decimal_macros::dec;
use std::sync::Arc;

pub fn policy() -> DeskPolicy {
    DeskPolicy {
        fees: FeeSchedule::default(),
        tax: Arc::new(FlatTaxRules::new(dec!(0.005), dec!(0.05))),
        partner: ForexPartner::default(),
        upload_base: "https://uploads.test/orders".to_string(),
    }
}

pub fn desk() -> RemitDesk {
    desk_with(
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemorySenderStore::new()),
        Box::new(InMemoryBeneficiaryStore::new()),
        Box::new(TextQuoteRenderer::new()),
    )
}

pub fn desk_with(
    orders: OrderStoreBox,
    senders: SenderStoreBox,
    beneficiaries: BeneficiaryStoreBox,
    renderer: QuoteDocumentRendererBox,
) -> RemitDesk {
    RemitDesk::new(orders, senders, beneficiaries, renderer, policy())
}

pub fn order_draft() -> OrderDraft {
    OrderDraft {
        student_name: "Asha Rao".to_string(),
        purpose: Purpose::UniversityFees,
        destination_country: Some("US".to_string()),
        currency: None,
        amount: dec!(1000),
        reference_rate: dec!(90.00),
        margin: dec!(1.00),
        bank_charge_bearer: BankChargeBearer::Our,
        has_education_loan: false,
        created_by: "ops@desk".to_string(),
    }
}

pub fn contact() -> ContactDetails {
    ContactDetails {
        email: "asha@example.com".to_string(),
        phone: "+91-98-7654-3210".to_string(),
        address_line: "14 MG Road".to_string(),
        city: "Pune".to_string(),
        postal_code: "411001".to_string(),
        country: "IN".to_string(),
    }
}

pub fn sender_draft() -> SenderDraft {
    SenderDraft {
        student_name: "Asha Rao".to_string(),
        student_id_number: None,
        payer: PayerRelation::Self_,
        contact: contact(),
        residency: Residency::Resident,
        payer_block: None,
    }
}

pub fn beneficiary_draft() -> BeneficiaryDraft {
    BeneficiaryDraft {
        name: "Yale University".to_string(),
        country: "US".to_string(),
        bank_name: "Chase".to_string(),
        route: BankRoute::Aba {
            routing_number: "021000021".to_string(),
            account_number: "1234567890".to_string(),
        },
        intermediary: None,
    }
}
