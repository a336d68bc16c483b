//! Sold ledger: units that have exited stock

use std::sync::Arc;

use shared::{Sku, SoldRecord};

use crate::error::AppResult;
use crate::store::{InventoryStore, SoldQuery};

/// Sold ledger service
#[derive(Clone)]
pub struct SoldLedger {
    store: Arc<dyn InventoryStore>,
}

impl SoldLedger {
    /// Create a new SoldLedger instance
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Append a record; fails with `Conflict` if the id is already recorded or still in stock
    pub async fn append(&self, record: &SoldRecord) -> AppResult<()> {
        self.store.insert_sold(record).await
    }

    /// Delete a record as a correction of the sales history
    ///
    /// The unit does not return to stock.
    pub async fn remove(&self, id: &Sku) -> AppResult<SoldRecord> {
        let removed = self.store.delete_sold(id).await?;
        tracing::info!("Deleted sold record {}", removed.id);
        Ok(removed)
    }

    /// Snapshot ordered by exit time, most recent first
    pub async fn all(&self) -> AppResult<Vec<SoldRecord>> {
        self.store.select_sold(&SoldQuery::all()).await
    }
}
