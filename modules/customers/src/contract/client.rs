use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Customer, EditCustomerCommand};

/// Public API for the customers module.
///
/// Failures carry a [`crate::contract::error::CustomersError`] inside the
/// `anyhow::Error`; callers can downcast to branch on the kind.
#[async_trait]
pub trait CustomersApi: Send + Sync {
    async fn get_customer(&self, id: Uuid) -> anyhow::Result<Customer>;

    /// Apply a sparse edit. Either every change is persisted or none is.
    async fn edit_customer(&self, command: EditCustomerCommand) -> anyhow::Result<Customer>;
}
