use std::collections::BTreeSet;

use tracing::warn;

use crate::contract::model::Customer;
use crate::domain::error::DomainError;

/// Effective value of a named field on the merged snapshot.
/// Returns `None` for field names the resolver does not know.
pub fn effective_field_value(customer: &Customer, field: &str) -> Option<String> {
    let value = match field {
        "email" => customer.email.clone(),
        "firstname" => customer.first_name.clone(),
        "lastname" => customer.last_name.clone(),
        "gender" => customer
            .gender
            .map(|g| g.as_str().to_string())
            .unwrap_or_default(),
        "birthday" => customer
            .birthday
            .map(|d| d.to_string())
            .unwrap_or_default(),
        "password" => customer.password_hash.clone().unwrap_or_default(),
        "company" => customer.business.company.clone(),
        "taxid" => customer.business.tax_id.clone(),
        "website" => customer.business.website.clone(),
        "creditterms" => customer.business.credit_terms.clone(),
        "riskclass" => customer.business.risk_class.clone(),
        _ => return None,
    };
    Some(value)
}

/// Check that every configured required field resolves to a non-empty value
/// on the merged snapshot. Field names are iterated in sorted order so the
/// first failure is deterministic. Unknown field names resolve as empty.
pub fn check_required_fields(
    customer: &Customer,
    required: &BTreeSet<String>,
) -> Result<(), DomainError> {
    for field in required {
        let value = match effective_field_value(customer, field) {
            Some(v) => v,
            None => {
                warn!(field = %field, "unknown required field name in configuration");
                String::new()
            }
        };
        if value.trim().is_empty() {
            return Err(DomainError::missing_required_field(field.clone()));
        }
    }
    Ok(())
}
