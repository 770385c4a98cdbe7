use anyhow::{anyhow, Result};
use sea_orm::Set;
use std::collections::BTreeSet;

use crate::contract::model::{BusinessAttributes, Customer, Gender};
use crate::infra::storage::entity::{ActiveModel, GroupIds, Model};

/// Convert a database entity to a contract model.
/// Fails on values the domain cannot represent (unknown gender codes).
pub fn entity_to_contract(entity: Model) -> Result<Customer> {
    let gender = entity
        .gender
        .as_deref()
        .map(|s| Gender::parse(s).ok_or_else(|| anyhow!("unknown gender code '{}'", s)))
        .transpose()?;

    Ok(Customer {
        id: entity.id,
        guest: entity.guest,
        email: entity.email,
        password_hash: entity.password_hash,
        first_name: entity.first_name,
        last_name: entity.last_name,
        gender,
        birthday: entity.birthday,
        enabled: entity.enabled,
        newsletter: entity.newsletter,
        partner_offers: entity.partner_offers,
        group_ids: entity.group_ids.0.into_iter().collect::<BTreeSet<i64>>(),
        default_group_id: entity.default_group_id,
        business: BusinessAttributes {
            company: entity.company,
            tax_id: entity.tax_id,
            website: entity.website,
            credit_terms: entity.credit_terms,
            risk_class: entity.risk_class,
        },
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

/// Convert a contract model to an active model with every column set.
pub fn contract_to_active_model(customer: Customer) -> ActiveModel {
    ActiveModel {
        id: Set(customer.id),
        guest: Set(customer.guest),
        email: Set(customer.email),
        password_hash: Set(customer.password_hash),
        first_name: Set(customer.first_name),
        last_name: Set(customer.last_name),
        gender: Set(customer.gender.map(|g| g.as_str().to_string())),
        birthday: Set(customer.birthday),
        enabled: Set(customer.enabled),
        newsletter: Set(customer.newsletter),
        partner_offers: Set(customer.partner_offers),
        group_ids: Set(GroupIds(customer.group_ids.into_iter().collect())),
        default_group_id: Set(customer.default_group_id),
        company: Set(customer.business.company),
        tax_id: Set(customer.business.tax_id),
        website: Set(customer.business.website),
        credit_terms: Set(customer.business.credit_terms),
        risk_class: Set(customer.business.risk_class),
        created_at: Set(customer.created_at),
        updated_at: Set(customer.updated_at),
    }
}
