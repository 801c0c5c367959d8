use crate::config::FeeSchedule;
use crate::domain::beneficiary::{Beneficiary, BeneficiaryDraft, BeneficiaryStatus};
use crate::domain::money::Rate;
use crate::domain::order::{Order, OrderDraft};
use crate::domain::ports::{
    BeneficiaryStoreBox, DocumentHandle, ForexPartner, OrderStoreBox, QuoteDocumentInput,
    QuoteDocumentRendererBox, SenderStoreBox,
};
use crate::domain::quote::{QuoteInputs, TaxRules};
use crate::domain::sender::{Sender, SenderDraft};
use crate::domain::status::{EditOutcome, OrderStatus, StatusTrigger};
use crate::error::{RemitError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where the caller should resume the Order → Sender → Beneficiary →
/// Documents sequence, derived solely from the order's linkage fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStep {
    Sender,
    /// The linked sender is pre-loaded for display.
    Beneficiary { sender: Sender },
    Documents,
}

/// How the beneficiary step is completed.
#[derive(Debug, Clone, PartialEq)]
pub enum BeneficiarySelection {
    /// Link an existing active beneficiary without mutating it.
    Existing(Uuid),
    /// Create a new beneficiary owned by this order.
    New(BeneficiaryDraft),
    /// Edit mode: update the given beneficiary in place, no duplicate.
    Edit { id: Uuid, draft: BeneficiaryDraft },
}

/// Per-item result of a fan-out deletion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurgeResult {
    pub id: Uuid,
    pub deleted: bool,
    pub reason: Option<String>,
}

/// A batch deletion reports how many items succeeded out of the total,
/// never a single pass/fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurgeOutcome {
    pub attempted: usize,
    pub deleted: usize,
    pub results: Vec<PurgeResult>,
}

/// Policy and collaborator configuration the desk operates under.
#[derive(Clone)]
pub struct DeskPolicy {
    pub fees: FeeSchedule,
    pub tax: Arc<dyn TaxRules>,
    pub partner: ForexPartner,
    pub upload_base: String,
}

/// The order-lifecycle orchestrator.
///
/// Owns the storage and rendering collaborators and sequences every
/// mutation for a client session, awaiting each call before the next.
/// Given only an order id, [`RemitDesk::resume`] reconstructs where the
/// flow left off; that id is the only durable state a client needs.
pub struct RemitDesk {
    orders: OrderStoreBox,
    senders: SenderStoreBox,
    beneficiaries: BeneficiaryStoreBox,
    renderer: QuoteDocumentRendererBox,
    policy: DeskPolicy,
}

impl RemitDesk {
    pub fn new(
        orders: OrderStoreBox,
        senders: SenderStoreBox,
        beneficiaries: BeneficiaryStoreBox,
        renderer: QuoteDocumentRendererBox,
        policy: DeskPolicy,
    ) -> Self {
        Self {
            orders,
            senders,
            beneficiaries,
            renderer,
            policy,
        }
    }

    async fn load_order(&self, id: Uuid) -> Result<Order> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| RemitError::not_found("order", id))
    }

    /// Prices and persists a new order in `Received`.
    pub async fn create_quote(&self, draft: OrderDraft) -> Result<Order> {
        let order = Order::price(draft, &self.policy.fees, self.policy.tax.as_ref())?;
        self.orders.create(order.clone()).await?;
        info!(order_id = %order.id, total = %order.pricing.total_payable, "order priced");
        Ok(order)
    }

    /// Recomputes pricing from fresh inputs, pre-authorization only.
    pub async fn reprice(&self, order_id: Uuid, inputs: QuoteInputs) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        order.reprice(inputs, &self.policy.fees, self.policy.tax.as_ref())?;
        self.orders.update(order.clone()).await?;
        Ok(order)
    }

    /// Flips the education-loan flag; only the TCS line and total move.
    pub async fn set_education_loan(&self, order_id: Uuid, has_loan: bool) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        order.set_education_loan(has_loan, self.policy.tax.as_ref())?;
        self.orders.update(order.clone()).await?;
        Ok(order)
    }

    /// Generates the quote document and records the download.
    ///
    /// The render is not rolled back if the status patch fails; the order
    /// keeps its prior status and the step can simply be retried.
    pub async fn download_quote(&self, order_id: Uuid) -> Result<(Order, DocumentHandle)> {
        let mut order = self.load_order(order_id).await?;
        if order.status.is_terminal() {
            return Err(RemitError::LockedOrder {
                id: order.id,
                status: order.status.to_string(),
            });
        }
        let input = self.document_input(&order);
        let handle = self.renderer.render(&input).await?;
        order.apply_trigger(StatusTrigger::QuoteDownloaded)?;
        if let Err(e) = self.orders.update(order.clone()).await {
            warn!(order_id = %order.id, error = %e, "quote rendered but status patch failed");
            return Err(e);
        }
        info!(order_id = %order.id, document = %handle.location, "quote downloaded");
        Ok((order, handle))
    }

    fn document_input(&self, order: &Order) -> QuoteDocumentInput {
        QuoteDocumentInput {
            generated_at: Utc::now(),
            order_id: order.id,
            student_name: order.student_name.clone(),
            destination_country: order.destination_country.clone(),
            purpose: order.purpose,
            currency: order.currency.clone(),
            amount: order.amount.value(),
            customer_rate: order.pricing.customer_rate,
            local_amount: order.pricing.local_amount,
            bank_fee: order.pricing.bank_fee,
            tax_on_conversion: order.pricing.tax_on_conversion,
            tax_collected_at_source: order.pricing.tax_collected_at_source,
            total_payable: order.pricing.total_payable,
            partner: self.policy.partner.clone(),
            upload_link: format!("{}/{}", self.policy.upload_base, order.id),
        }
    }

    /// Reconstructs which step of the flow the caller should resume at.
    /// Idempotent: with no intervening writes, repeated calls return the
    /// same step.
    pub async fn resume(&self, order_id: Uuid) -> Result<FlowStep> {
        let order = self.load_order(order_id).await?;
        match (order.sender_id, order.beneficiary_id) {
            (None, _) => Ok(FlowStep::Sender),
            (Some(sender_id), None) => {
                let sender = self
                    .senders
                    .get(sender_id)
                    .await?
                    .ok_or_else(|| RemitError::not_found("sender", sender_id))?;
                Ok(FlowStep::Beneficiary { sender })
            }
            (Some(_), Some(_)) => Ok(FlowStep::Documents),
        }
    }

    /// Creates (or, on re-entry, updates) the sender record and links it,
    /// moving the order to `Pending`.
    pub async fn link_sender(&self, order_id: Uuid, draft: SenderDraft) -> Result<(Order, Sender)> {
        let mut order = self.load_order(order_id).await?;
        draft.validate()?;

        let sender = match order.sender_id {
            Some(existing_id) => {
                let mut sender = self
                    .senders
                    .get(existing_id)
                    .await?
                    .ok_or_else(|| RemitError::not_found("sender", existing_id))?;
                sender.apply(draft);
                self.senders.update(sender.clone()).await?;
                sender
            }
            None => {
                let sender = draft.into_sender(Uuid::new_v4(), order.id);
                self.senders.create(sender.clone()).await?;
                sender
            }
        };

        order.link_sender(sender.id);
        order.apply_trigger(StatusTrigger::SenderLinked)?;
        self.orders.update(order.clone()).await?;
        info!(order_id = %order.id, sender_id = %sender.id, "sender linked");
        Ok((order, sender))
    }

    /// Completes the beneficiary step by selection, creation, or in-place
    /// edit. Selecting an existing beneficiary never mutates it.
    pub async fn attach_beneficiary(
        &self,
        order_id: Uuid,
        selection: BeneficiarySelection,
    ) -> Result<(Order, Beneficiary)> {
        let mut order = self.load_order(order_id).await?;

        let beneficiary = match selection {
            BeneficiarySelection::Existing(id) => {
                let beneficiary = self
                    .beneficiaries
                    .get(id)
                    .await?
                    .ok_or_else(|| RemitError::not_found("beneficiary", id))?;
                if beneficiary.status != BeneficiaryStatus::Active {
                    return Err(RemitError::invalid(
                        "beneficiaryId",
                        "beneficiary is inactive",
                    ));
                }
                beneficiary
            }
            BeneficiarySelection::New(draft) => {
                draft.validate()?;
                let beneficiary = draft.into_beneficiary(Uuid::new_v4());
                self.beneficiaries.create(beneficiary.clone()).await?;
                beneficiary
            }
            BeneficiarySelection::Edit { id, draft } => {
                draft.validate()?;
                let mut beneficiary = self
                    .beneficiaries
                    .get(id)
                    .await?
                    .ok_or_else(|| RemitError::not_found("beneficiary", id))?;
                beneficiary.apply(draft);
                self.beneficiaries.update(beneficiary.clone()).await?;
                beneficiary
            }
        };

        order.link_beneficiary(beneficiary.id)?;
        self.orders.update(order.clone()).await?;
        info!(order_id = %order.id, beneficiary_id = %beneficiary.id, "beneficiary linked");
        Ok((order, beneficiary))
    }

    /// Records the document set as submitted. Requires both links.
    pub async fn submit_documents(&self, order_id: Uuid) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        if order.sender_id.is_none() || order.beneficiary_id.is_none() {
            return Err(RemitError::invalid(
                "documents",
                "sender and beneficiary must be linked before documents",
            ));
        }
        order.apply_trigger(StatusTrigger::DocumentsSubmitted)?;
        self.orders.update(order.clone()).await?;
        info!(order_id = %order.id, "documents placed");
        Ok(order)
    }

    /// Confirms authorization. Only valid on a `DocumentsPlaced` order;
    /// terminal for the review flow.
    pub async fn authorize(&self, order_id: Uuid) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        order.apply_trigger(StatusTrigger::AuthorizeConfirmed)?;
        self.orders.update(order.clone()).await?;
        info!(order_id = %order.id, "order authorized");
        Ok(order)
    }

    /// Resolves the rate-status popup with the "Blocked" selection.
    pub async fn block_rate(&self, order_id: Uuid) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        order.apply_trigger(StatusTrigger::RateBlocked)?;
        self.orders.update(order.clone()).await?;
        info!(order_id = %order.id, "rate blocked");
        Ok(order)
    }

    /// Direct staff status edit. Locked targets and terminal orders are
    /// silent no-ops. The edit is optimistic: if the store write fails,
    /// the returned error leaves the last confirmed status standing.
    pub async fn set_status(&self, order_id: Uuid, requested: OrderStatus) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        let confirmed = order.status;
        match order.set_status_directly(requested) {
            EditOutcome::Unchanged => {
                debug!(order_id = %order.id, status = %confirmed, requested = %requested, "status edit unavailable");
                Ok(order)
            }
            EditOutcome::Applied(next) => {
                if let Err(e) = self.orders.update(order.clone()).await {
                    order.status = confirmed;
                    warn!(order_id = %order.id, confirmed = %order.status, attempted = %next, "status patch failed; keeping last confirmed status");
                    return Err(e);
                }
                info!(order_id = %order.id, from = %confirmed, to = %next, "status updated");
                Ok(order)
            }
        }
    }

    /// Corrects a priced order's rates after the fact, recording the
    /// override. Rejected once the order is authorized or completed.
    pub async fn override_rate(
        &self,
        order_id: Uuid,
        new_ibr: Decimal,
        new_customer: Decimal,
        new_settlement: Decimal,
    ) -> Result<Order> {
        let mut order = self.load_order(order_id).await?;
        order.override_rate(
            Rate::new(new_ibr)?,
            Rate::new(new_customer)?,
            Rate::new(new_settlement)?,
            &self.policy.fees,
            self.policy.tax.as_ref(),
        )?;
        self.orders.update(order.clone()).await?;
        info!(
            order_id = %order.id,
            customer_rate = %order.pricing.customer_rate,
            "rate overridden"
        );
        Ok(order)
    }

    /// Deletes each beneficiary independently; one failure does not stop
    /// the rest. The outcome lists every item.
    pub async fn purge_beneficiaries(&self, ids: &[Uuid]) -> PurgeOutcome {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.beneficiaries.delete(id).await {
                Ok(()) => results.push(PurgeResult {
                    id,
                    deleted: true,
                    reason: None,
                }),
                Err(e) => {
                    debug!(beneficiary_id = %id, error = %e, "purge item failed");
                    results.push(PurgeResult {
                        id,
                        deleted: false,
                        reason: Some(e.to_string()),
                    });
                }
            }
        }
        let deleted = results.iter().filter(|r| r.deleted).count();
        PurgeOutcome {
            attempted: ids.len(),
            deleted,
            results,
        }
    }

    /// Active beneficiaries offered for selection.
    pub async fn selectable_beneficiaries(&self) -> Result<Vec<Beneficiary>> {
        self.beneficiaries.list_active().await
    }

    pub async fn order(&self, order_id: Uuid) -> Result<Order> {
        self.load_order(order_id).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.orders.all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beneficiary::BankRoute;
    use crate::domain::order::Purpose;
    use crate::domain::quote::BankChargeBearer;
    use crate::domain::sender::{ContactDetails, PayerRelation, Residency};
    use crate::infrastructure::in_memory::{
        InMemoryBeneficiaryStore, InMemoryOrderStore, InMemorySenderStore,
    };
    use crate::infrastructure::renderer::TextQuoteRenderer;
    use crate::infrastructure::tax::FlatTaxRules;
    use rust_decimal_macros::dec;

    fn desk() -> RemitDesk {
        RemitDesk::new(
            Box::new(InMemoryOrderStore::new()),
            Box::new(InMemorySenderStore::new()),
            Box::new(InMemoryBeneficiaryStore::new()),
            Box::new(TextQuoteRenderer::new()),
            DeskPolicy {
                fees: FeeSchedule::default(),
                tax: Arc::new(FlatTaxRules::new(dec!(0.005), dec!(0.05))),
                partner: ForexPartner::default(),
                upload_base: "https://uploads.test/orders".to_string(),
            },
        )
    }

    fn order_draft() -> OrderDraft {
        OrderDraft {
            student_name: "Asha Rao".to_string(),
            purpose: Purpose::UniversityFees,
            destination_country: Some("GB".to_string()),
            currency: None,
            amount: dec!(1000),
            reference_rate: dec!(90.00),
            margin: dec!(1.00),
            bank_charge_bearer: BankChargeBearer::Our,
            has_education_loan: false,
            created_by: "ops@desk".to_string(),
        }
    }

    fn sender_draft() -> SenderDraft {
        SenderDraft {
            student_name: "Asha Rao".to_string(),
            student_id_number: None,
            payer: PayerRelation::Self_,
            contact: ContactDetails {
                email: "asha@example.com".to_string(),
                phone: "+91-98-7654-3210".to_string(),
                address_line: "14 MG Road".to_string(),
                city: "Pune".to_string(),
                postal_code: "411001".to_string(),
                country: "IN".to_string(),
            },
            residency: Residency::Resident,
            payer_block: None,
        }
    }

    fn beneficiary_draft() -> BeneficiaryDraft {
        BeneficiaryDraft {
            name: "Imperial College".to_string(),
            country: "GB".to_string(),
            bank_name: "Barclays".to_string(),
            route: BankRoute::SortCode {
                sort_code: "20-00-00".to_string(),
                account_number: "55779911".to_string(),
            },
            intermediary: None,
        }
    }

    #[tokio::test]
    async fn test_resume_walks_the_sequence() {
        let desk = desk();
        let order = desk.create_quote(order_draft()).await.unwrap();

        assert_eq!(desk.resume(order.id).await.unwrap(), FlowStep::Sender);
        // Idempotent with no intervening writes.
        assert_eq!(desk.resume(order.id).await.unwrap(), FlowStep::Sender);

        let (_, sender) = desk.link_sender(order.id, sender_draft()).await.unwrap();
        match desk.resume(order.id).await.unwrap() {
            FlowStep::Beneficiary { sender: loaded } => assert_eq!(loaded.id, sender.id),
            step => panic!("expected beneficiary step, got {step:?}"),
        }

        desk.attach_beneficiary(order.id, BeneficiarySelection::New(beneficiary_draft()))
            .await
            .unwrap();
        assert_eq!(desk.resume(order.id).await.unwrap(), FlowStep::Documents);
    }

    #[tokio::test]
    async fn test_resume_unknown_order() {
        let desk = desk();
        assert!(matches!(
            desk.resume(Uuid::new_v4()).await,
            Err(RemitError::NotFound { entity: "order", .. })
        ));
    }

    #[tokio::test]
    async fn test_sender_link_moves_order_to_pending() {
        let desk = desk();
        let order = desk.create_quote(order_draft()).await.unwrap();
        let (order, _) = desk.link_sender(order.id, sender_draft()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_sender_reentry_updates_in_place() {
        let desk = desk();
        let order = desk.create_quote(order_draft()).await.unwrap();
        let (_, first) = desk.link_sender(order.id, sender_draft()).await.unwrap();

        let mut edited = sender_draft();
        edited.student_name = "Asha R. Rao".to_string();
        let (_, second) = desk.link_sender(order.id, edited).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.student_name, "Asha R. Rao");
    }

    #[tokio::test]
    async fn test_selecting_existing_beneficiary_does_not_mutate() {
        let desk = desk();
        let existing = beneficiary_draft().into_beneficiary(Uuid::new_v4());
        desk.beneficiaries.create(existing.clone()).await.unwrap();

        let order = desk.create_quote(order_draft()).await.unwrap();
        desk.link_sender(order.id, sender_draft()).await.unwrap();
        let (order, linked) = desk
            .attach_beneficiary(order.id, BeneficiarySelection::Existing(existing.id))
            .await
            .unwrap();

        assert_eq!(order.beneficiary_id, Some(existing.id));
        let stored = desk.beneficiaries.get(existing.id).await.unwrap().unwrap();
        assert_eq!(stored, existing);
        assert_eq!(linked, existing);
    }

    #[tokio::test]
    async fn test_inactive_beneficiary_cannot_be_selected() {
        let desk = desk();
        let mut existing = beneficiary_draft().into_beneficiary(Uuid::new_v4());
        existing.status = BeneficiaryStatus::Inactive;
        desk.beneficiaries.create(existing.clone()).await.unwrap();

        let order = desk.create_quote(order_draft()).await.unwrap();
        desk.link_sender(order.id, sender_draft()).await.unwrap();
        assert!(matches!(
            desk.attach_beneficiary(order.id, BeneficiarySelection::Existing(existing.id))
                .await,
            Err(RemitError::InvalidInput {
                field: "beneficiaryId",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_full_flow_through_authorization() {
        let desk = desk();
        let order = desk.create_quote(order_draft()).await.unwrap();
        desk.download_quote(order.id).await.unwrap();
        desk.link_sender(order.id, sender_draft()).await.unwrap();
        desk.attach_beneficiary(order.id, BeneficiarySelection::New(beneficiary_draft()))
            .await
            .unwrap();
        let order = desk.submit_documents(order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::DocumentsPlaced);

        let order = desk.authorize(order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Authorized);

        // Terminal: further free edits are silently unavailable.
        let order = desk.set_status(order.id, OrderStatus::Pending).await.unwrap();
        assert_eq!(order.status, OrderStatus::Authorized);
    }

    #[tokio::test]
    async fn test_authorize_requires_documents_placed() {
        let desk = desk();
        let order = desk.create_quote(order_draft()).await.unwrap();
        assert!(matches!(
            desk.authorize(order.id).await,
            Err(RemitError::LockedOrder { .. })
        ));
    }

    #[tokio::test]
    async fn test_purge_reports_per_item_outcomes() {
        let desk = desk();
        let kept = beneficiary_draft().into_beneficiary(Uuid::new_v4());
        desk.beneficiaries.create(kept.clone()).await.unwrap();
        let missing = Uuid::new_v4();

        let outcome = desk.purge_beneficiaries(&[kept.id, missing]).await;
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.deleted, 1);
        assert!(outcome.results[0].deleted);
        assert!(!outcome.results[1].deleted);
        assert!(outcome.results[1].reason.is_some());
    }
}
