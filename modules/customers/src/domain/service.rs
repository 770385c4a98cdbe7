use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{Customer, CustomerType, EditCustomerCommand};
use crate::domain::error::DomainError;
use crate::domain::ports::PasswordHasher;
use crate::domain::repo::CustomersRepository;
use crate::domain::required_fields::check_required_fields;

/// Domain service with the business rules for editing customers.
/// Depends only on the repository and hasher ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn CustomersRepository>,
    hasher: Arc<dyn PasswordHasher>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Legacy compatibility secret mixed into password hashes.
    pub password_secondary_key: String,
    pub max_name_length: usize,
    /// Required field names per customer type; presence is checked against
    /// the merged snapshot.
    pub required_fields: BTreeMap<CustomerType, BTreeSet<String>>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let mut required_fields = BTreeMap::new();
        required_fields.insert(
            CustomerType::Registered,
            BTreeSet::from(["email".to_string(), "firstname".to_string(), "lastname".to_string()]),
        );
        Self {
            password_secondary_key: String::new(),
            max_name_length: 100,
            required_fields,
        }
    }
}

impl ServiceConfig {
    pub fn required_fields_for(&self, customer_type: CustomerType) -> BTreeSet<String> {
        self.required_fields
            .get(&customer_type)
            .cloned()
            .unwrap_or_default()
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn CustomersRepository>,
        hasher: Arc<dyn PasswordHasher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            hasher,
            config,
        }
    }

    #[instrument(name = "customers.service.get_customer", skip(self), fields(customer_id = %id))]
    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, DomainError> {
        debug!("Getting customer by id");

        let customer = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::customer_not_found(id))?;
        debug!("Successfully retrieved customer");
        Ok(customer)
    }

    /// Apply a sparse edit: load, check invariants against effective values,
    /// merge in memory, then validate and persist. Any failure aborts before
    /// the write; no partial state is ever stored.
    #[instrument(
        name = "customers.service.edit_customer",
        skip(self, command),
        fields(customer_id = %command.customer_id)
    )]
    pub async fn edit_customer(
        &self,
        command: EditCustomerCommand,
    ) -> Result<Customer, DomainError> {
        info!("Editing customer");

        // Load
        let mut customer = self
            .repo
            .find_by_id(command.customer_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::customer_not_found(command.customer_id))?;

        // Invariant checks run against effective (post-merge) values: a
        // command may change groups without the default or vice versa, and
        // either alone can make the final state inconsistent.
        self.check_email_uniqueness(&customer, &command).await?;
        check_default_group_membership(&customer, &command)?;

        // Merge
        self.apply_command(&mut customer, command);

        // Persistence gate
        let required = self.config.required_fields_for(customer.customer_type());
        check_required_fields(&customer, &required)?;
        customer
            .validate(self.config.max_name_length)
            .map_err(|issue| DomainError::invalid_customer(issue.field, issue.message))?;

        self.repo
            .save(customer.clone())
            .await
            .map_err(|e| DomainError::persistence_failure(e.to_string()))?;

        info!("Successfully edited customer");
        Ok(customer)
    }

    /// Email uniqueness among registered accounts. Guests may share an email;
    /// an unchanged email never conflicts, regardless of other accounts.
    async fn check_email_uniqueness(
        &self,
        customer: &Customer,
        command: &EditCustomerCommand,
    ) -> Result<(), DomainError> {
        if customer.guest {
            debug!("Guest account, skipping email uniqueness check");
            return Ok(());
        }
        let candidate = match command.email.as_deref() {
            Some(email) if email != customer.email => email,
            _ => return Ok(()),
        };

        let existing = self
            .repo
            .find_registered_by_email(candidate)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if let Some(other) = existing {
            if other.id != customer.id {
                return Err(DomainError::duplicate_email(candidate));
            }
        }
        Ok(())
    }

    /// Overwrite each attribute the command sets; untouched fields keep the
    /// stored value. Passwords are hashed here, never stored as plain text.
    fn apply_command(&self, customer: &mut Customer, command: EditCustomerCommand) {
        let EditCustomerCommand {
            customer_id: _,
            gender,
            first_name,
            last_name,
            email,
            password,
            birthday,
            enabled,
            partner_offers,
            newsletter,
            group_ids,
            default_group_id,
            company,
            tax_id,
            website,
            credit_terms,
            risk_class,
        } = command;

        if let Some(gender) = gender {
            customer.gender = Some(gender);
        }
        if let Some(first_name) = first_name {
            customer.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            customer.last_name = last_name;
        }
        if let Some(email) = email {
            customer.email = email;
        }
        if let Some(password) = password {
            customer.password_hash = Some(
                self.hasher
                    .hash(&password, &self.config.password_secondary_key),
            );
        }
        if let Some(birthday) = birthday {
            customer.birthday = Some(birthday);
        }
        if let Some(enabled) = enabled {
            customer.enabled = enabled;
        }
        if let Some(partner_offers) = partner_offers {
            customer.partner_offers = partner_offers;
        }
        if let Some(newsletter) = newsletter {
            customer.newsletter = newsletter;
        }
        if let Some(group_ids) = group_ids {
            customer.group_ids = group_ids;
        }
        if let Some(default_group_id) = default_group_id {
            customer.default_group_id = default_group_id;
        }

        merge_business_fields(customer, company, tax_id, website, credit_terms, risk_class);

        customer.updated_at = Utc::now();
    }
}

/// B2B attributes merge as a separate sub-step, before the persistence gate.
fn merge_business_fields(
    customer: &mut Customer,
    company: Option<String>,
    tax_id: Option<String>,
    website: Option<String>,
    credit_terms: Option<String>,
    risk_class: Option<String>,
) {
    if let Some(company) = company {
        customer.business.company = company;
    }
    if let Some(tax_id) = tax_id {
        customer.business.tax_id = tax_id;
    }
    if let Some(website) = website {
        customer.business.website = website;
    }
    if let Some(credit_terms) = credit_terms {
        customer.business.credit_terms = credit_terms;
    }
    if let Some(risk_class) = risk_class {
        customer.business.risk_class = risk_class;
    }
}

/// Membership is checked on the effective group set and effective default
/// group: the command's value where present, the stored value otherwise.
fn check_default_group_membership(
    customer: &Customer,
    command: &EditCustomerCommand,
) -> Result<(), DomainError> {
    if command.group_ids.is_none() && command.default_group_id.is_none() {
        return Ok(());
    }

    let effective_groups = command.group_ids.as_ref().unwrap_or(&customer.group_ids);
    let effective_default = command
        .default_group_id
        .unwrap_or(customer.default_group_id);

    if !effective_groups.contains(&effective_default) {
        return Err(DomainError::default_group_not_in_groups(effective_default));
    }
    Ok(())
}
