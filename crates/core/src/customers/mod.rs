//! Customer lifecycle rules.
//!
//! The service owns the one business invariant (an email belongs to at most one customer) and the
//! partial-update semantics. The gateway behind it is a plain query executor.

pub mod gateway;
pub mod memory;

use tracing::{debug, info, warn};

pub use gateway::{CustomerGateway, GatewayError};
pub use memory::InMemoryCustomerGateway;

use crate::domain::customer::{CreateCustomerRequest, Customer, CustomerId, UpdateCustomerRequest};
use crate::errors::{ApplicationError, CustomerError};

pub struct CustomerService<G> {
    gateway: G,
}

impl<G: CustomerGateway> CustomerService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApplicationError> {
        Ok(self.gateway.find_all().await?)
    }

    pub async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, ApplicationError> {
        self.gateway
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerError::not_found(id).into())
    }

    /// Persists a new customer unless its email is already taken.
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, ApplicationError> {
        if self.gateway.find_by_email(&request.email).await?.is_some() {
            warn!(
                event_name = "customer.create_rejected",
                email = %request.email,
                "email already held by another customer"
            );
            return Err(CustomerError::email_unavailable(&request.email).into());
        }

        let email = request.email.clone();
        let saved = self.gateway.save(request.into_customer()).await.map_err(|error| match error {
            GatewayError::DuplicateEmail(_) => {
                ApplicationError::from(CustomerError::email_unavailable(&email))
            }
            other => ApplicationError::from(other),
        })?;

        info!(
            event_name = "customer.created",
            customer_id = ?saved.id,
            "customer created"
        );
        Ok(saved)
    }

    /// Applies the supplied fields of `request` to customer `id` and saves the result.
    ///
    /// A field is overwritten only when supplied and different from the stored value. A changed
    /// email is re-checked against every other customer before anything is written. A lookup that
    /// finds this same customer (a case-only change of its own email) is not a conflict.
    /// An empty request still loads and re-saves the stored customer.
    pub async fn update_customer(
        &self,
        id: CustomerId,
        request: UpdateCustomerRequest,
    ) -> Result<Customer, ApplicationError> {
        let mut customer =
            self.gateway.find_by_id(id).await?.ok_or_else(|| CustomerError::not_found(id))?;

        if request.is_empty() {
            debug!(
                event_name = "customer.update_empty",
                customer_id = %id,
                "update carried no fields; re-saving stored customer"
            );
        }

        if let Some(name) = request.name {
            if name != customer.name {
                customer.name = name;
            }
        }

        if let Some(email) = request.email {
            if email != customer.email {
                if let Some(holder) = self.gateway.find_by_email(&email).await? {
                    if holder.id != customer.id {
                        warn!(
                            event_name = "customer.update_rejected",
                            customer_id = %id,
                            email = %email,
                            "email already held by another customer"
                        );
                        return Err(CustomerError::email_unavailable_to_update(&email).into());
                    }
                }
                customer.email = email;
            }
        }

        if let Some(address) = request.address {
            if address != customer.address {
                customer.address = address;
            }
        }

        let attempted_email = customer.email.clone();
        let saved = self.gateway.save(customer).await.map_err(|error| match error {
            GatewayError::DuplicateEmail(_) => {
                ApplicationError::from(CustomerError::email_unavailable_to_update(&attempted_email))
            }
            other => ApplicationError::from(other),
        })?;

        debug!(event_name = "customer.updated", customer_id = %id, "customer updated");
        Ok(saved)
    }

    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), ApplicationError> {
        if !self.gateway.exists_by_id(id).await? {
            return Err(CustomerError::not_exist(id).into());
        }

        self.gateway.delete_by_id(id).await?;
        info!(event_name = "customer.deleted", customer_id = %id, "customer deleted");
        Ok(())
    }
}
