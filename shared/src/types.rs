//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Unit identifier (SKU), e.g. "HSA0001"
///
/// Always stored in normalized form: surrounding whitespace trimmed and
/// letters uppercased, so scanner input and stored ids compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Normalize raw scanner or form input into an identifier
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = normalize_scan(raw);
        if normalized.is_empty() {
            return Err(DomainError::validation("id", "Identifier must not be empty"));
        }
        if normalized.chars().any(char::is_control) {
            return Err(DomainError::validation(
                "id",
                "Identifier must not contain control characters",
            ));
        }
        Ok(Sku(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Built by the identifier generator, which only emits normalized text
    pub(crate) fn from_generated(value: String) -> Self {
        Sku(value)
    }
}

/// Trim and uppercase scanner input
pub fn normalize_scan(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sku {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sku::parse(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Sku::parse(&value)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
