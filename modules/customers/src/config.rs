use std::collections::{BTreeMap, BTreeSet};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::contract::model::CustomerType;
use crate::domain::service::ServiceConfig;

/// Configuration for the customers module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomersConfig {
    /// Legacy compatibility secret mixed into password hashes.
    #[serde(default)]
    pub password_secondary_key: String,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Required field names keyed by customer type ("guest" / "registered").
    #[serde(default = "default_required_fields")]
    pub required_fields: BTreeMap<String, BTreeSet<String>>,
}

impl Default for CustomersConfig {
    fn default() -> Self {
        Self {
            password_secondary_key: String::new(),
            max_name_length: default_max_name_length(),
            required_fields: default_required_fields(),
        }
    }
}

fn default_max_name_length() -> usize {
    100
}

fn default_required_fields() -> BTreeMap<String, BTreeSet<String>> {
    let mut fields = BTreeMap::new();
    fields.insert(
        "registered".to_string(),
        BTreeSet::from(["email".to_string(), "firstname".to_string(), "lastname".to_string()]),
    );
    fields
}

impl CustomersConfig {
    /// Deserialize from the application's per-module config bag.
    /// A missing entry falls back to defaults.
    pub fn from_module_value(value: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        match value {
            Some(v) => serde_json::from_value(v.clone())
                .context("Failed to parse 'customers' module configuration"),
            None => Ok(Self::default()),
        }
    }
}

impl From<CustomersConfig> for ServiceConfig {
    fn from(config: CustomersConfig) -> Self {
        let mut required_fields = BTreeMap::new();
        for (key, fields) in config.required_fields {
            match CustomerType::parse(&key) {
                Some(customer_type) => {
                    required_fields.insert(customer_type, fields);
                }
                None => warn!(key = %key, "unknown customer type in required_fields config"),
            }
        }
        ServiceConfig {
            password_secondary_key: config.password_secondary_key,
            max_name_length: config.max_name_length,
            required_fields,
        }
    }
}
