use crate::domain::beneficiary::{Beneficiary, BeneficiaryStatus};
use crate::domain::order::Order;
use crate::domain::ports::{BeneficiaryStore, OrderStore, SenderStore};
use crate::domain::sender::Sender;
use crate::error::{RemitError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Order>>>` to allow shared concurrent
/// access. Ideal for testing or single-process runs where persistence is
/// not required.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn update(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for senders.
#[derive(Default, Clone)]
pub struct InMemorySenderStore {
    senders: Arc<RwLock<HashMap<Uuid, Sender>>>,
}

impl InMemorySenderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SenderStore for InMemorySenderStore {
    async fn create(&self, sender: Sender) -> Result<()> {
        let mut senders = self.senders.write().await;
        senders.insert(sender.id, sender);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Sender>> {
        let senders = self.senders.read().await;
        Ok(senders.get(&id).cloned())
    }

    async fn update(&self, sender: Sender) -> Result<()> {
        let mut senders = self.senders.write().await;
        senders.insert(sender.id, sender);
        Ok(())
    }
}

/// A thread-safe in-memory store for beneficiaries.
#[derive(Default, Clone)]
pub struct InMemoryBeneficiaryStore {
    beneficiaries: Arc<RwLock<HashMap<Uuid, Beneficiary>>>,
}

impl InMemoryBeneficiaryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BeneficiaryStore for InMemoryBeneficiaryStore {
    async fn create(&self, beneficiary: Beneficiary) -> Result<()> {
        let mut beneficiaries = self.beneficiaries.write().await;
        beneficiaries.insert(beneficiary.id, beneficiary);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Beneficiary>> {
        let beneficiaries = self.beneficiaries.read().await;
        Ok(beneficiaries.get(&id).cloned())
    }

    async fn update(&self, beneficiary: Beneficiary) -> Result<()> {
        let mut beneficiaries = self.beneficiaries.write().await;
        beneficiaries.insert(beneficiary.id, beneficiary);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut beneficiaries = self.beneficiaries.write().await;
        beneficiaries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RemitError::not_found("beneficiary", id))
    }

    async fn list_active(&self) -> Result<Vec<Beneficiary>> {
        let beneficiaries = self.beneficiaries.read().await;
        Ok(beneficiaries
            .values()
            .filter(|b| b.status == BeneficiaryStatus::Active)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beneficiary::{BankRoute, BeneficiaryDraft};

    fn beneficiary() -> Beneficiary {
        BeneficiaryDraft {
            name: "TU Berlin".to_string(),
            country: "DE".to_string(),
            bank_name: "Deutsche Bank".to_string(),
            route: BankRoute::Iban {
                iban: "DE89370400440532013000".to_string(),
            },
            intermediary: None,
        }
        .into_beneficiary(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_beneficiary_store_round_trip() {
        let store = InMemoryBeneficiaryStore::new();
        let b = beneficiary();
        store.create(b.clone()).await.unwrap();
        let retrieved = store.get(b.id).await.unwrap().unwrap();
        assert_eq!(retrieved, b);

        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_beneficiary_errors() {
        let store = InMemoryBeneficiaryStore::new();
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(RemitError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_active_filters_inactive() {
        let store = InMemoryBeneficiaryStore::new();
        let active = beneficiary();
        let mut inactive = beneficiary();
        inactive.status = BeneficiaryStatus::Inactive;
        store.create(active.clone()).await.unwrap();
        store.create(inactive).await.unwrap();

        let listed = store.list_active().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, active.id);
    }
}
