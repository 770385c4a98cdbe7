use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror.
/// Every variant is terminal for the operation that raised it.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Customer not found: {id}")]
    CustomerNotFound { id: Uuid },

    #[error("Email '{email}' is already used by another registered customer")]
    DuplicateEmail { email: String },

    #[error("Default group {default_group_id} is not among the assigned groups")]
    DefaultGroupNotInGroups { default_group_id: i64 },

    #[error("Required field '{field}' is empty")]
    MissingRequiredField { field: String },

    #[error("Invalid customer: {field}: {message}")]
    InvalidCustomer { field: String, message: String },

    #[error("Storage rejected the write: {message}")]
    PersistenceFailure { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn customer_not_found(id: Uuid) -> Self {
        Self::CustomerNotFound { id }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn default_group_not_in_groups(default_group_id: i64) -> Self {
        Self::DefaultGroupNotInGroups { default_group_id }
    }

    pub fn missing_required_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn invalid_customer(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCustomer {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn persistence_failure(message: impl Into<String>) -> Self {
        Self::PersistenceFailure {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
