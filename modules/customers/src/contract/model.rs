use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use url::Url;
use uuid::Uuid;

/// Pure customer model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    /// Guest accounts have no unique login email and may share an address
    /// with other accounts.
    pub guest: bool,
    pub email: String,
    /// Opaque hash produced by the hashing port; never plain text.
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    pub enabled: bool,
    pub newsletter: bool,
    pub partner_offers: bool,
    /// Assigned group identifiers.
    pub group_ids: BTreeSet<i64>,
    /// Primary classification group; must be a member of `group_ids`.
    pub default_group_id: i64,
    pub business: BusinessAttributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// B2B attribute block. Empty strings mean "not provided".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BusinessAttributes {
    pub company: String,
    pub tax_id: String,
    pub website: String,
    pub credit_terms: String,
    pub risk_class: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Diverse => "diverse",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "diverse" => Some(Gender::Diverse),
            _ => None,
        }
    }
}

/// Key used to resolve required fields from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CustomerType {
    Guest,
    Registered,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Guest => "guest",
            CustomerType::Registered => "registered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "guest" => Some(CustomerType::Guest),
            "registered" => Some(CustomerType::Registered),
            _ => None,
        }
    }
}

/// A record-level validation failure: the offending field and a short reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl Customer {
    pub fn customer_type(&self) -> CustomerType {
        if self.guest {
            CustomerType::Guest
        } else {
            CustomerType::Registered
        }
    }

    /// Record-level format checks over the current attribute values.
    /// Presence of required fields is a separate, configuration-driven concern.
    pub fn validate(&self, max_name_length: usize) -> Result<(), ValidationIssue> {
        if !self.email.is_empty() && (!self.email.contains('@') || !self.email.contains('.')) {
            return Err(ValidationIssue {
                field: "email",
                message: format!("invalid email format: '{}'", self.email),
            });
        }
        if self.first_name.len() > max_name_length {
            return Err(ValidationIssue {
                field: "firstname",
                message: format!(
                    "first name too long: {} characters (max: {})",
                    self.first_name.len(),
                    max_name_length
                ),
            });
        }
        if self.last_name.len() > max_name_length {
            return Err(ValidationIssue {
                field: "lastname",
                message: format!(
                    "last name too long: {} characters (max: {})",
                    self.last_name.len(),
                    max_name_length
                ),
            });
        }
        if let Some(birthday) = self.birthday {
            if birthday > Utc::now().date_naive() {
                return Err(ValidationIssue {
                    field: "birthday",
                    message: format!("birthday lies in the future: {}", birthday),
                });
            }
        }
        if !self.business.website.is_empty() && Url::parse(&self.business.website).is_err() {
            return Err(ValidationIssue {
                field: "website",
                message: format!("not a valid URL: '{}'", self.business.website),
            });
        }
        Ok(())
    }
}

/// Sparse edit request: `None` leaves an attribute unchanged, `Some(value)`
/// sets it to exactly `value`. An explicit empty string is a concrete value,
/// not "unchanged".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditCustomerCommand {
    pub customer_id: Uuid,
    pub gender: Option<Gender>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Plain-text password; hashed during merge, never persisted as-is.
    pub password: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub enabled: Option<bool>,
    pub partner_offers: Option<bool>,
    pub newsletter: Option<bool>,
    pub group_ids: Option<BTreeSet<i64>>,
    pub default_group_id: Option<i64>,
    // B2B block
    pub company: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub credit_terms: Option<String>,
    pub risk_class: Option<String>,
}

impl EditCustomerCommand {
    /// An edit that changes nothing yet.
    pub fn new(customer_id: Uuid) -> Self {
        Self {
            customer_id,
            ..Default::default()
        }
    }
}
