pub mod client;
pub mod error;
pub mod model;

pub use client::CustomersApi;
pub use error::CustomersError;
pub use model::{
    BusinessAttributes, Customer, CustomerType, EditCustomerCommand, Gender, ValidationIssue,
};
