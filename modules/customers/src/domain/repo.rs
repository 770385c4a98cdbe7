use crate::contract::model::Customer;
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CustomersRepository: Send + Sync {
    /// Load a customer by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>>;
    /// Look up a *registered* (non-guest) customer by email.
    /// Guest accounts never participate in uniqueness checks.
    async fn find_registered_by_email(&self, email: &str) -> anyhow::Result<Option<Customer>>;
    /// Insert a fully-formed customer. Creation flows live outside this
    /// module; this exists for seeding and fixtures.
    async fn insert(&self, customer: Customer) -> anyhow::Result<()>;
    /// Persist the merged customer (by primary key in `customer.id`).
    async fn save(&self, customer: Customer) -> anyhow::Result<()>;
}
