use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::CustomersApi,
    error::CustomersError,
    model::{Customer, EditCustomerCommand},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the CustomersApi trait that delegates to the domain service
pub struct CustomersLocalClient {
    service: Arc<Service>,
}

impl CustomersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CustomersApi for CustomersLocalClient {
    async fn get_customer(&self, id: Uuid) -> anyhow::Result<Customer> {
        self.service
            .get_customer(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn edit_customer(&self, command: EditCustomerCommand) -> anyhow::Result<Customer> {
        self.service
            .edit_customer(command)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::CustomerNotFound { id } => CustomersError::not_found(id),
        DomainError::DuplicateEmail { email } => CustomersError::email_conflict(email),
        DomainError::DefaultGroupNotInGroups { default_group_id } => {
            CustomersError::invalid_default_group(default_group_id)
        }
        DomainError::MissingRequiredField { field } => CustomersError::missing_field(field),
        DomainError::InvalidCustomer { field, message } => {
            CustomersError::validation(format!("{}: {}", field, message))
        }
        DomainError::PersistenceFailure { .. } | DomainError::Database { .. } => {
            CustomersError::internal()
        }
    };

    anyhow::Error::new(contract_error)
}
