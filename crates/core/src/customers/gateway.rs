use async_trait::async_trait;
use thiserror::Error;

use crate::domain::customer::{Customer, CustomerId};
use crate::errors::{ApplicationError, CustomerError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The store refused a write because another row already holds this email.
    #[error("email `{0}` is already held by another customer")]
    DuplicateEmail(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<GatewayError> for ApplicationError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::DuplicateEmail(email) => {
                Self::Customer(CustomerError::email_unavailable(&email))
            }
            GatewayError::Storage(message) => Self::Persistence(message),
        }
    }
}

/// Storage access for customers. Implementations run queries and nothing else; every business
/// rule lives in [`crate::customers::CustomerService`].
#[async_trait]
pub trait CustomerGateway: Send + Sync {
    /// All customers in ascending id order.
    async fn find_all(&self) -> Result<Vec<Customer>, GatewayError>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, GatewayError>;

    /// Email equality follows the store's collation, which is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, GatewayError>;

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, GatewayError>;

    /// Inserts when `customer.id` is `None`, otherwise updates the row with that id.
    /// Returns the stored customer with its id populated.
    async fn save(&self, customer: Customer) -> Result<Customer, GatewayError>;

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), GatewayError>;

    async fn delete_all(&self) -> Result<(), GatewayError>;
}
