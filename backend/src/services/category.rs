//! Category registry

use std::sync::Arc;

use chrono::Utc;
use shared::{Category, NewCategory};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Ordered set of categories and their identifier prefix codes
#[derive(Clone)]
pub struct CategoryRegistry {
    store: Arc<dyn InventoryStore>,
}

impl CategoryRegistry {
    /// Create a new CategoryRegistry instance
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// All categories ordered by name
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.store.list_categories().await
    }

    /// Register a category
    ///
    /// Empty fields and a prefix code or name already in use are validation
    /// failures; a duplicate that slips past the check surfaces as `Conflict`
    /// from the store.
    pub async fn add(&self, input: NewCategory) -> AppResult<Category> {
        let input = input.normalized()?;

        let existing = self.store.list_categories().await?;
        if existing.iter().any(|c| c.prefix_code == input.prefix_code) {
            return Err(AppError::validation(
                "prefix_code",
                format!("Prefix code {} is already used", input.prefix_code),
            ));
        }
        if existing.iter().any(|c| c.name.eq_ignore_ascii_case(&input.name)) {
            return Err(AppError::validation(
                "name",
                format!("Category {} already exists", input.name),
            ));
        }

        let category = input.into_category(Utc::now());
        self.store.insert_category(&category).await?;

        tracing::info!(
            "Registered category {} with prefix {}",
            category.name,
            category.prefix_code
        );
        Ok(category)
    }

    /// Look up a category by exact name
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let name = name.trim();
        Ok(self
            .store
            .list_categories()
            .await?
            .into_iter()
            .find(|c| c.name == name))
    }
}
