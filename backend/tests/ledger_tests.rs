//! Stock ledger and identifier generation tests
//!
//! Tests for unit registration including:
//! - Identifier uniqueness across stock and sold history
//! - Sequence monotonicity per category and brand prefix
//! - Validation failures leave the ledger untouched

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::identifier::{brand_prefix, sequence_of};
use chrono::Utc;
use shared::{Grade, NewCategory, NewStockUnit, Sku, SoldRecord, StockUnit};
use stockroom_backend::error::AppError;
use stockroom_backend::services::{CategoryRegistry, CheckoutService, SoldLedger, StockLedger};
use stockroom_backend::store::{InventoryStore, MemoryStore};

async fn seeded_store() -> Arc<dyn InventoryStore> {
    let store: Arc<dyn InventoryStore> = Arc::new(MemoryStore::new());
    let registry = CategoryRegistry::new(store.clone());
    registry.add(NewCategory::new("Handphone", "H")).await.unwrap();
    registry.add(NewCategory::new("Laptop", "L")).await.unwrap();
    registry.add(NewCategory::new("Tablet", "T")).await.unwrap();
    store
}

fn new_unit(category: &str, brand_model: &str, price: i64) -> NewStockUnit {
    NewStockUnit {
        category: category.to_string(),
        brand_model: brand_model.to_string(),
        grade: Grade::A,
        purchase_price: Decimal::new(price, 0),
        condition: None,
    }
}

fn stocked_unit(id: &str) -> StockUnit {
    StockUnit {
        id: Sku::parse(id).unwrap(),
        category: "Handphone".to_string(),
        brand_model: "Samsung S24".to_string(),
        grade: Grade::A,
        purchase_price: Decimal::new(100, 0),
        condition: String::new(),
        created_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Handphone "Samsung S24" then "Samsung A10" share the HSA sequence
    #[tokio::test]
    async fn test_samsung_sequence() {
        let ledger = StockLedger::new(seeded_store().await);

        let first = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        let second = ledger.register(new_unit("Handphone", "Samsung A10", 100)).await.unwrap();

        assert_eq!(first.id.as_str(), "HSA0001");
        assert_eq!(second.id.as_str(), "HSA0002");
    }

    /// Categories number independently
    #[tokio::test]
    async fn test_sequences_are_scoped_by_category() {
        let ledger = StockLedger::new(seeded_store().await);

        let phone = ledger.register(new_unit("Handphone", "Apple iPhone 13", 100)).await.unwrap();
        let laptop = ledger.register(new_unit("Laptop", "Apple MacBook Air", 100)).await.unwrap();
        let tablet = ledger.register(new_unit("Tablet", "Apple iPad", 100)).await.unwrap();

        assert_eq!(phone.id.as_str(), "HAP0001");
        assert_eq!(laptop.id.as_str(), "LAP0001");
        assert_eq!(tablet.id.as_str(), "TAP0001");
    }

    /// Empty brand/model is rejected before anything is written
    #[tokio::test]
    async fn test_empty_brand_model_is_rejected() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone());

        let err = ledger.register(new_unit("Handphone", "", 100)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = ledger.next_identifier("Handphone", "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        assert!(ledger.all().await.unwrap().is_empty());
    }

    /// Negative prices never reach the store
    #[tokio::test]
    async fn test_negative_price_is_rejected() {
        let ledger = StockLedger::new(seeded_store().await);
        let err = ledger.register(new_unit("Handphone", "Oppo A5", -1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "purchase_price"));
    }

    /// A sold identifier keeps its slot by default
    #[tokio::test]
    async fn test_sold_identifier_is_not_reused() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone());
        let checkout = CheckoutService::new(store.clone());

        ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        checkout.checkout("HSA0001", &true).await.unwrap();

        let next = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        assert_eq!(next.id.as_str(), "HSA0002");
    }

    /// Deleting the sold record that held the top number frees it again
    #[tokio::test]
    async fn test_deleted_sold_record_frees_its_number() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone());
        let checkout = CheckoutService::new(store.clone());

        ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        checkout.checkout("HSA0001", &true).await.unwrap();
        SoldLedger::new(store).remove(&"HSA0001".parse().unwrap()).await.unwrap();

        let next = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        assert_eq!(next.id.as_str(), "HSA0001");
    }

    /// With reservation off only the active stock counts
    #[tokio::test]
    async fn test_active_only_numbering() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone()).with_sold_reservation(false);

        ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        ledger.remove(&"HSA0002".parse().unwrap()).await.unwrap();

        let next = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        assert_eq!(next.id.as_str(), "HSA0002");
    }

    /// Active-only numbering still refuses an id that sits in the sold ledger
    #[tokio::test]
    async fn test_active_only_numbering_cannot_collide_with_sold() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone()).with_sold_reservation(false);
        let checkout = CheckoutService::new(store.clone());

        ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        checkout.checkout("HSA0001", &true).await.unwrap();

        let err = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(ledger.all().await.unwrap().is_empty());
        assert_eq!(SoldLedger::new(store).all().await.unwrap().len(), 1);
    }

    /// Sequence 9999 is the last one a prefix can hand out
    #[tokio::test]
    async fn test_register_past_capacity_fails() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone());
        ledger.insert(&stocked_unit("HSA9999")).await.unwrap();

        let err = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap_err();
        assert!(matches!(err, AppError::Capacity { .. }));

        let ids: Vec<String> = ledger.all().await.unwrap().into_iter().map(|u| u.id.to_string()).collect();
        assert_eq!(ids, vec!["HSA9999"]);
    }

    /// A sold id cannot be inserted back into stock
    #[tokio::test]
    async fn test_insert_of_sold_id_conflicts() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone());
        let checkout = CheckoutService::new(store.clone());

        let unit = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();
        checkout.checkout("HSA0001", &true).await.unwrap();

        let err = ledger.insert(&unit).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(ledger.find_by_id(&unit.id).await.unwrap().is_none());
    }

    /// A unit still in stock cannot be appended to the sold ledger
    #[tokio::test]
    async fn test_append_of_stocked_id_conflicts() {
        let store = seeded_store().await;
        let ledger = StockLedger::new(store.clone());
        let sold = SoldLedger::new(store.clone());

        let unit = ledger.register(new_unit("Handphone", "Samsung S24", 100)).await.unwrap();

        let err = sold.append(&SoldRecord::retire(&unit, Utc::now())).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(sold.all().await.unwrap().is_empty());
        assert!(ledger.find_by_id(&unit.id).await.unwrap().is_some());
    }

    /// Appending the same record twice is rejected
    #[tokio::test]
    async fn test_duplicate_sold_append_conflicts() {
        let store = seeded_store().await;
        let sold = SoldLedger::new(store);
        let record = SoldRecord::retire(&stocked_unit("HSA0001"), Utc::now());

        sold.append(&record).await.unwrap();
        let err = sold.append(&record).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(sold.all().await.unwrap().len(), 1);
    }

    /// Sequence picks up after the highest number, not the count
    #[tokio::test]
    async fn test_sequence_continues_after_removed_unit() {
        let ledger = StockLedger::new(seeded_store().await);

        for _ in 0..3 {
            ledger.register(new_unit("Laptop", "Dell Latitude", 100)).await.unwrap();
        }
        ledger.remove(&"LDE0002".parse().unwrap()).await.unwrap();

        let next = ledger.register(new_unit("Laptop", "Dell XPS", 100)).await.unwrap();
        assert_eq!(next.id.as_str(), "LDE0004");
    }

    /// Category filter only returns that category, newest first
    #[tokio::test]
    async fn test_category_listing() {
        let ledger = StockLedger::new(seeded_store().await);
        ledger.register(new_unit("Handphone", "Xiaomi 13", 100)).await.unwrap();
        ledger.register(new_unit("Laptop", "Lenovo T480", 100)).await.unwrap();
        ledger.register(new_unit("Handphone", "Xiaomi 14", 100)).await.unwrap();

        let phones = ledger.in_category("Handphone").await.unwrap();
        let ids: Vec<&str> = phones.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["HXI0002", "HXI0001"]);
    }

    /// Duplicate category prefix is rejected
    #[tokio::test]
    async fn test_duplicate_category_prefix() {
        let store = seeded_store().await;
        let registry = CategoryRegistry::new(store);
        let err = registry.add(NewCategory::new("Headphones", "H")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(registry.list().await.unwrap().len(), 3);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for brand/model names with a handful of shared prefixes
    fn brand_model_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Samsung S24".to_string()),
            Just("Samsung A10".to_string()),
            Just("Sony Xperia".to_string()),
            Just("Apple iPhone".to_string()),
            Just("Asus Zenfone".to_string()),
            Just("Oppo Reno".to_string()),
            "[A-Za-z][A-Za-z0-9 ]{0,12}",
        ]
    }

    fn category_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("Handphone"), Just("Laptop"), Just("Tablet")]
    }

    /// Register (true) or check out the oldest unit (false)
    fn step_strategy() -> impl Strategy<Value = (bool, &'static str, String)> {
        (prop::bool::weighted(0.75), category_strategy(), brand_model_strategy())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// No two units share an identifier and no sold identifier comes back
        #[test]
        fn prop_identifier_uniqueness(steps in prop::collection::vec(step_strategy(), 1..40)) {
            tokio_test::block_on(async {
                let store = seeded_store().await;
                let ledger = StockLedger::new(store.clone());
                let checkout = CheckoutService::new(store.clone());
                let mut issued = HashSet::new();

                for (register, category, brand_model) in &steps {
                    if *register {
                        let unit = ledger
                            .register(new_unit(category, brand_model, 10))
                            .await
                            .unwrap();
                        prop_assert!(issued.insert(unit.id.clone()), "reused {}", unit.id);
                    } else if let Some(unit) = ledger.all().await.unwrap().pop() {
                        checkout.checkout(unit.id.as_str(), &true).await.unwrap();
                    }
                }

                let active = ledger.all().await.unwrap();
                let distinct: HashSet<_> = active.iter().map(|u| u.id.clone()).collect();
                prop_assert_eq!(distinct.len(), active.len());
                Ok(())
            })?;
        }

        /// Sequential inserts under one prefix number 1, 2, 3... with no gaps
        #[test]
        fn prop_sequence_monotonic_without_gaps(
            brand_models in prop::collection::vec(brand_model_strategy(), 1..30)
        ) {
            tokio_test::block_on(async {
                let ledger = StockLedger::new(seeded_store().await);
                let mut last: HashMap<String, u32> = HashMap::new();

                for brand_model in &brand_models {
                    let unit = ledger
                        .register(new_unit("Handphone", brand_model, 10))
                        .await
                        .unwrap();
                    let prefix = format!("H{}", brand_prefix(brand_model).unwrap());
                    let seq = sequence_of(unit.id.as_str(), &prefix).unwrap();

                    let expected = last.get(&prefix).copied().unwrap_or(0) + 1;
                    prop_assert_eq!(seq, expected);
                    last.insert(prefix, seq);
                }
                Ok(())
            })?;
        }
    }
}
