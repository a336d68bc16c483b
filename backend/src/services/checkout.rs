//! Checkout transition: moves one unit from the stock ledger to the sold ledger
//!
//! Two entry points share the same transition:
//! - manual checkout of a chosen identifier, where a missing unit is an error
//! - scan checkout, fired when the scan buffer is long enough and exactly
//!   matches an active identifier; a miss just means "no match yet"
//!
//! Both require an explicit confirmation before anything is written.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use shared::scan::{ScanBuffer, DEFAULT_SCAN_MIN_LENGTH};
use shared::{Sku, SoldRecord, StockUnit};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Approval gate asked before a unit leaves stock
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, unit: &StockUnit) -> bool;
}

/// A decision made up front, e.g. a `confirmed` flag in a request body
#[async_trait]
impl Confirmation for bool {
    async fn confirm(&self, _unit: &StockUnit) -> bool {
        *self
    }
}

/// Result of a manual checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    CheckedOut(SoldRecord),
    /// Confirmation refused; neither ledger changed
    Declined,
}

/// Result of evaluating the scan buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Buffer shorter than the trigger length
    Pending,
    /// Long enough but not an active identifier
    NoMatch,
    Declined,
    CheckedOut(SoldRecord),
}

/// Checkout service
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn InventoryStore>,
    scan_min_length: usize,
}

impl CheckoutService {
    /// Create a new CheckoutService instance
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            store,
            scan_min_length: DEFAULT_SCAN_MIN_LENGTH,
        }
    }

    pub fn with_scan_min_length(mut self, min_length: usize) -> Self {
        self.scan_min_length = min_length;
        self
    }

    /// Manual checkout of `raw_id`
    ///
    /// Fails with `NotFound` when no active unit has that identifier, both
    /// before confirmation and when another caller retired it first.
    pub async fn checkout(
        &self,
        raw_id: &str,
        confirmation: &dyn Confirmation,
    ) -> AppResult<CheckoutOutcome> {
        let id = Sku::parse(raw_id)?;
        let unit = self
            .store
            .find_stock(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))?;

        if !confirmation.confirm(&unit).await {
            tracing::debug!("Checkout of {} declined", unit.id);
            return Ok(CheckoutOutcome::Declined);
        }

        let record = self.complete(&unit).await?;
        Ok(CheckoutOutcome::CheckedOut(record))
    }

    /// Scan-triggered checkout for the current buffer content
    pub async fn scan(
        &self,
        buffer: &str,
        confirmation: &dyn Confirmation,
    ) -> AppResult<ScanOutcome> {
        let mut scan = ScanBuffer::new(self.scan_min_length);
        scan.set(buffer);
        if !scan.is_ready() {
            return Ok(ScanOutcome::Pending);
        }

        let id = match Sku::parse(scan.value()) {
            Ok(id) => id,
            Err(_) => return Ok(ScanOutcome::NoMatch),
        };
        let unit = match self.store.find_stock(&id).await? {
            Some(unit) => unit,
            None => {
                tracing::debug!("Scan {} matched no active unit", id);
                return Ok(ScanOutcome::NoMatch);
            }
        };

        if !confirmation.confirm(&unit).await {
            tracing::debug!("Scan checkout of {} declined", unit.id);
            return Ok(ScanOutcome::Declined);
        }

        match self.complete(&unit).await {
            Ok(record) => Ok(ScanOutcome::CheckedOut(record)),
            Err(err) if err.is_not_found() => Ok(ScanOutcome::NoMatch),
            Err(err) => Err(err),
        }
    }

    async fn complete(&self, unit: &StockUnit) -> AppResult<SoldRecord> {
        let record = self.store.transfer_to_sold(unit, Utc::now()).await?;
        tracing::info!(
            "Checked out {} ({}) at {}",
            record.id,
            record.brand_model,
            record.exited_at
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use shared::Grade;

    async fn store_with(ids: &[&str]) -> Arc<dyn InventoryStore> {
        let store: Arc<dyn InventoryStore> = Arc::new(MemoryStore::new());
        for id in ids {
            store
                .insert_stock(&StockUnit {
                    id: Sku::parse(id).unwrap(),
                    category: "Handphone".to_string(),
                    brand_model: "Samsung S24".to_string(),
                    grade: Grade::A,
                    purchase_price: Decimal::new(1_000, 0),
                    condition: String::new(),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_manual_checkout_normalizes_input() {
        let service = CheckoutService::new(store_with(&["HSA0001"]).await);
        let outcome = service.checkout("  hsa0001 ", &true).await.unwrap();
        match outcome {
            CheckoutOutcome::CheckedOut(record) => assert_eq!(record.id.as_str(), "HSA0001"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_declined_is_noop() {
        let store = store_with(&["HSA0001"]).await;
        let service = CheckoutService::new(store.clone());
        let outcome = service.checkout("HSA0001", &false).await.unwrap();
        assert_eq!(outcome, CheckoutOutcome::Declined);
        assert!(store
            .find_stock(&Sku::parse("HSA0001").unwrap())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_scan_states() {
        let service = CheckoutService::new(store_with(&["HSA0001"]).await);
        assert_eq!(service.scan("HSA00", &true).await.unwrap(), ScanOutcome::Pending);
        assert_eq!(service.scan("HSA0002", &true).await.unwrap(), ScanOutcome::NoMatch);
        assert_eq!(service.scan("hsa0001", &false).await.unwrap(), ScanOutcome::Declined);
        assert!(matches!(
            service.scan("hsa0001", &true).await.unwrap(),
            ScanOutcome::CheckedOut(_)
        ));
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(ScanOutcome::NoMatch).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_match" }));
    }
}
