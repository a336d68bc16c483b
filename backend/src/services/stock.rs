//! Stock ledger: the authoritative set of unsold units

use std::sync::Arc;

use chrono::Utc;
use shared::identifier::{combined_prefix, next_for_prefix};
use shared::{NewStockUnit, Sku, StockUnit, StockUnitPatch};

use crate::error::{AppError, AppResult};
use crate::services::category::CategoryRegistry;
use crate::store::{InventoryStore, SoldQuery, StockQuery};

/// Stock ledger service
#[derive(Clone)]
pub struct StockLedger {
    store: Arc<dyn InventoryStore>,
    reserve_sold_sequences: bool,
}

impl StockLedger {
    /// Create a new StockLedger; sold identifiers keep their sequence slots
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            store,
            reserve_sold_sequences: true,
        }
    }

    /// Choose whether the sold history takes part in sequence numbering
    pub fn with_sold_reservation(mut self, reserve: bool) -> Self {
        self.reserve_sold_sequences = reserve;
        self
    }

    /// Identifier the next unit of `brand_model` in `category_name` would get
    pub async fn next_identifier(&self, category_name: &str, brand_model: &str) -> AppResult<Sku> {
        let category = CategoryRegistry::new(self.store.clone())
            .find_by_name(category_name)
            .await?
            .ok_or_else(|| {
                AppError::validation("category", format!("Unknown category {}", category_name.trim()))
            })?;

        let prefix = combined_prefix(&category.prefix_code, brand_model)?;

        let mut taken: Vec<Sku> = self
            .store
            .select_stock(&StockQuery::with_prefix(prefix.clone()))
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        if self.reserve_sold_sequences {
            taken.extend(
                self.store
                    .select_sold(&SoldQuery::with_prefix(prefix))
                    .await?
                    .into_iter()
                    .map(|r| r.id),
            );
        }

        Ok(next_for_prefix(&category.prefix_code, brand_model, &taken)?)
    }

    /// Register a new unit under a freshly generated identifier
    pub async fn register(&self, input: NewStockUnit) -> AppResult<StockUnit> {
        let input = input.normalized()?;
        let id = self.next_identifier(&input.category, &input.brand_model).await?;
        let unit = input.into_unit(id, Utc::now());

        self.insert(&unit).await?;

        tracing::info!("Registered unit {} ({})", unit.id, unit.brand_model);
        Ok(unit)
    }

    /// Insert a fully built unit; fails with `Conflict` if the id is in either ledger
    pub async fn insert(&self, unit: &StockUnit) -> AppResult<()> {
        self.store.insert_stock(unit).await
    }

    /// Update the mutable fields of a unit
    pub async fn update(&self, id: &Sku, patch: StockUnitPatch) -> AppResult<StockUnit> {
        let patch = patch.normalized()?;
        self.store.update_stock(id, &patch).await
    }

    /// Remove a unit without selling it
    pub async fn remove(&self, id: &Sku) -> AppResult<StockUnit> {
        let removed = self.store.delete_stock(id).await?;
        tracing::info!("Removed unit {} from stock", removed.id);
        Ok(removed)
    }

    /// Snapshot of the whole ledger, newest first
    pub async fn all(&self) -> AppResult<Vec<StockUnit>> {
        self.store.select_stock(&StockQuery::all()).await
    }

    /// Snapshot of one category, newest first
    pub async fn in_category(&self, category: &str) -> AppResult<Vec<StockUnit>> {
        self.store
            .select_stock(&StockQuery::in_category(category.trim()))
            .await
    }

    pub async fn find_by_id(&self, id: &Sku) -> AppResult<Option<StockUnit>> {
        self.store.find_stock(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use shared::{Grade, NewCategory};

    async fn ledger() -> StockLedger {
        let store: Arc<dyn InventoryStore> = Arc::new(MemoryStore::new());
        CategoryRegistry::new(store.clone())
            .add(NewCategory::new("Handphone", "H"))
            .await
            .unwrap();
        StockLedger::new(store)
    }

    fn phone(brand_model: &str) -> NewStockUnit {
        NewStockUnit {
            category: "Handphone".to_string(),
            brand_model: brand_model.to_string(),
            grade: Grade::A,
            purchase_price: Decimal::new(2_500_000, 0),
            condition: Some("  minor scratches ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_generates_sequential_ids() {
        let ledger = ledger().await;
        let first = ledger.register(phone("Samsung S24")).await.unwrap();
        let second = ledger.register(phone("Samsung A10")).await.unwrap();

        assert_eq!(first.id.as_str(), "HSA0001");
        assert_eq!(second.id.as_str(), "HSA0002");
        assert_eq!(first.condition, "minor scratches");
    }

    #[tokio::test]
    async fn test_unknown_category_is_validation_error() {
        let ledger = ledger().await;
        let mut input = phone("Samsung S24");
        input.category = "Tablet".to_string();
        let err = ledger.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "category"));
    }

    #[tokio::test]
    async fn test_update_missing_unit_is_not_found() {
        let ledger = ledger().await;
        let patch = StockUnitPatch {
            grade: Some(Grade::B),
            ..Default::default()
        };
        let err = ledger
            .update(&Sku::parse("HSA0404").unwrap(), patch)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
