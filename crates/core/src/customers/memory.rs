use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::gateway::{CustomerGateway, GatewayError};
use crate::domain::customer::{Customer, CustomerId};

/// In-process gateway with the same uniqueness rules as the SQL store. Every `save` and
/// `delete_by_id` call is recorded, including rejected ones, so tests can assert on writes.
#[derive(Default)]
pub struct InMemoryCustomerGateway {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    customers: BTreeMap<i64, Customer>,
    last_id: i64,
    saves: Vec<Customer>,
    deletes: Vec<CustomerId>,
    unavailable: Option<String>,
}

impl MemoryState {
    fn check_available(&self) -> Result<(), GatewayError> {
        match &self.unavailable {
            Some(reason) => Err(GatewayError::Storage(reason.clone())),
            None => Ok(()),
        }
    }

    fn email_holder(&self, email: &str) -> Option<&Customer> {
        self.customers.values().find(|customer| customer.email.eq_ignore_ascii_case(email))
    }
}

impl InMemoryCustomerGateway {
    /// Seeds the store without recording the inserts as saves.
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let mut state = MemoryState::default();
        for mut customer in customers {
            let id = match customer.id {
                Some(id) => id.0,
                None => state.last_id + 1,
            };
            customer.id = Some(CustomerId(id));
            state.last_id = state.last_id.max(id);
            state.customers.insert(id, customer);
        }
        Self { state: RwLock::new(state) }
    }

    pub async fn saved(&self) -> Vec<Customer> {
        self.state.read().await.saves.clone()
    }

    pub async fn deleted(&self) -> Vec<CustomerId> {
        self.state.read().await.deletes.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.customers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Makes every subsequent call fail with a storage error until cleared with `None`.
    pub async fn set_unavailable(&self, reason: Option<String>) {
        self.state.write().await.unavailable = reason;
    }
}

#[async_trait]
impl CustomerGateway for InMemoryCustomerGateway {
    async fn find_all(&self) -> Result<Vec<Customer>, GatewayError> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.customers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, GatewayError> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.customers.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, GatewayError> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.email_holder(email).cloned())
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, GatewayError> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.customers.contains_key(&id.0))
    }

    async fn save(&self, mut customer: Customer) -> Result<Customer, GatewayError> {
        let mut state = self.state.write().await;
        state.saves.push(customer.clone());
        state.check_available()?;

        if let Some(holder) = state.email_holder(&customer.email) {
            if holder.id != customer.id {
                return Err(GatewayError::DuplicateEmail(customer.email));
            }
        }

        let id = match customer.id {
            Some(id) => id.0,
            None => state.last_id + 1,
        };
        state.last_id = state.last_id.max(id);
        customer.id = Some(CustomerId(id));
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), GatewayError> {
        let mut state = self.state.write().await;
        state.deletes.push(id);
        state.check_available()?;
        state.customers.remove(&id.0);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), GatewayError> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.customers.clear();
        Ok(())
    }
}
