//! Category registry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::validation::{validate_category_name, validate_prefix_code};

/// A unit category such as "Handphone" or "Laptop"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    /// 1-2 uppercase letters that start every identifier in this category
    pub prefix_code: String,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a category
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub prefix_code: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, prefix_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix_code: prefix_code.into(),
        }
    }

    /// Trim the name, uppercase the prefix code and check both
    pub fn normalized(&self) -> DomainResult<NewCategory> {
        let name = self.name.trim().to_string();
        let prefix_code = self.prefix_code.trim().to_uppercase();

        validate_category_name(&name).map_err(|m| DomainError::validation("name", m))?;
        validate_prefix_code(&prefix_code).map_err(|m| DomainError::validation("prefix_code", m))?;

        Ok(NewCategory { name, prefix_code })
    }

    /// Build the persisted category; call on normalized input
    pub fn into_category(self, created_at: DateTime<Utc>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: self.name,
            prefix_code: self.prefix_code,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_uppercases_prefix() {
        let input = NewCategory::new("  Laptop ", "lp");
        let normalized = input.normalized().unwrap();
        assert_eq!(normalized.name, "Laptop");
        assert_eq!(normalized.prefix_code, "LP");
    }

    #[test]
    fn test_normalized_rejects_empty_fields() {
        assert!(matches!(
            NewCategory::new("", "H").normalized(),
            Err(DomainError::Validation { ref field, .. }) if field == "name"
        ));
        assert!(matches!(
            NewCategory::new("Handphone", " ").normalized(),
            Err(DomainError::Validation { ref field, .. }) if field == "prefix_code"
        ));
    }
}
