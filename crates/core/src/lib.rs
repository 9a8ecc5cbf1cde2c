pub mod config;
pub mod customers;
pub mod domain;
pub mod errors;

pub use customers::{CustomerGateway, CustomerService, GatewayError, InMemoryCustomerGateway};
pub use domain::customer::{CreateCustomerRequest, Customer, CustomerId, UpdateCustomerRequest};
pub use errors::{ApplicationError, CustomerError, CustomerErrorKind, InterfaceError};
