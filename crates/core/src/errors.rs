use serde::Serialize;
use thiserror::Error;

use crate::domain::customer::CustomerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerErrorKind {
    CustomerNotFound,
    EmailUnavailable,
}

impl CustomerErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerNotFound => "customer_not_found",
            Self::EmailUnavailable => "email_unavailable",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CustomerError {
    pub kind: CustomerErrorKind,
    pub message: String,
}

impl CustomerError {
    pub fn new(kind: CustomerErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Lookup by id found nothing (get and update).
    pub fn not_found(id: CustomerId) -> Self {
        Self::new(CustomerErrorKind::CustomerNotFound, format!("Customer with id {id} doesn't found"))
    }

    /// Existence check before delete failed.
    pub fn not_exist(id: CustomerId) -> Self {
        Self::new(CustomerErrorKind::CustomerNotFound, format!("Customer with id {id} doesn't exist."))
    }

    pub fn email_unavailable(email: &str) -> Self {
        Self::new(CustomerErrorKind::EmailUnavailable, format!("The email {email} unavailable."))
    }

    pub fn email_unavailable_to_update(email: &str) -> Self {
        Self::new(
            CustomerErrorKind::EmailUnavailable,
            format!("The email \"{email}\" unavailable to update"),
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == CustomerErrorKind::CustomerNotFound
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Customer(#[from] CustomerError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    pub fn customer_kind(&self) -> Option<CustomerErrorKind> {
        match self {
            Self::Customer(error) => Some(error.kind),
            Self::Persistence(_) | Self::Configuration(_) => None,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("conflict: {message}")]
    Conflict { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn bad_request(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), correlation_id: correlation_id.into() }
    }

    /// Message safe to hand back to a caller. Storage and configuration detail stays in logs.
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. } => message,
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Conflict { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Conflict { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Customer(CustomerError {
                kind: CustomerErrorKind::CustomerNotFound,
                message,
            }) => Self::NotFound { message, correlation_id },
            ApplicationError::Customer(CustomerError {
                kind: CustomerErrorKind::EmailUnavailable,
                message,
            }) => Self::Conflict { message, correlation_id },
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::Configuration(message) => Self::Internal { message, correlation_id },
        }
    }
}
