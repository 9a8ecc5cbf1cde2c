use clientele_core::customers::GatewayError;
use thiserror::Error;

pub mod customer;

pub use customer::SqlCustomerRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for GatewayError {
    fn from(value: RepositoryError) -> Self {
        GatewayError::Storage(value.to_string())
    }
}
