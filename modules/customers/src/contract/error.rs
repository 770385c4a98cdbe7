use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone)]
pub enum CustomersError {
    #[error("Customer not found: {id}")]
    NotFound { id: Uuid },

    #[error("Email '{email}' is already used by another registered customer")]
    EmailConflict { email: String },

    #[error("Default group {group_id} is not among the assigned groups")]
    InvalidDefaultGroup { group_id: i64 },

    #[error("Required field '{field}' is empty")]
    MissingField { field: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl CustomersError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn email_conflict(email: String) -> Self {
        Self::EmailConflict { email }
    }

    pub fn invalid_default_group(group_id: i64) -> Self {
        Self::InvalidDefaultGroup { group_id }
    }

    pub fn missing_field(field: String) -> Self {
        Self::MissingField { field }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}
