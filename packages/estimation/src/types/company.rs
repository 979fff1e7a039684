//! Target company identity.

use serde::{Deserialize, Serialize};

/// Placeholder strings that spreadsheets use for a missing name.
const PLACEHOLDER_NAMES: &[&str] = &["n/a", "null", "none"];

/// The company whose revenue is being estimated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Name used in queries and for name matching.
    pub name: String,

    /// Street address, empty when unknown.
    #[serde(default)]
    pub address: String,

    /// City, empty when unknown.
    #[serde(default)]
    pub city: String,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Same company under a different name, keeping the location.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: self.address.clone(),
            city: self.city.clone(),
        }
    }

    pub fn has_location(&self) -> bool {
        !self.address.trim().is_empty() || !self.city.trim().is_empty()
    }
}

/// Whether a spreadsheet name cell holds a usable company name.
pub fn is_valid_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !PLACEHOLDER_NAMES.contains(&trimmed.to_lowercase().as_str())
}
