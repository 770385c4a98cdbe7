use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub guest: bool,
    // Uniqueness for non-guest rows is enforced by a partial index in the
    // initial migration; a plain `unique` here would also bind guests.
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub enabled: bool,
    pub newsletter: bool,
    pub partner_offers: bool,
    pub group_ids: GroupIds,
    pub default_group_id: i64,
    pub company: String,
    pub tax_id: String,
    pub website: String,
    pub credit_terms: String,
    pub risk_class: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assigned group identifiers, stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GroupIds(pub Vec<i64>);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
