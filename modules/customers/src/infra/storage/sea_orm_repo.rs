//! SeaORM-backed repository implementation for the domain port.
//!
//! This struct is generic over `C: ConnectionTrait`, so you can construct it
//! with a `DatabaseConnection` **or** a transactional connection.

use anyhow::Context;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::contract::model::Customer;
use crate::domain::repo::CustomersRepository;
use crate::infra::storage::entity::{Column, Entity as CustomerEntity};
use crate::infra::storage::mapper::{contract_to_active_model, entity_to_contract};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> CustomersRepository for SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>> {
        let found = CustomerEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        found.map(entity_to_contract).transpose()
    }

    async fn find_registered_by_email(&self, email: &str) -> anyhow::Result<Option<Customer>> {
        let found = CustomerEntity::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Guest.eq(false))
            .one(&self.conn)
            .await
            .context("find_registered_by_email failed")?;
        found.map(entity_to_contract).transpose()
    }

    async fn insert(&self, customer: Customer) -> anyhow::Result<()> {
        let model = contract_to_active_model(customer);
        let _ = model.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }

    async fn save(&self, customer: Customer) -> anyhow::Result<()> {
        let model = contract_to_active_model(customer);
        let _ = model.update(&self.conn).await.context("save failed")?;
        Ok(())
    }
}
