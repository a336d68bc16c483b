//! Reporting service for dashboard statistics

use std::sync::Arc;

use shared::aggregate::{summarize, InventorySummary};

use crate::error::AppResult;
use crate::store::{InventoryStore, SoldQuery, StockQuery};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn InventoryStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Dashboard totals computed from fresh ledger snapshots
    pub async fn summary(&self) -> AppResult<InventorySummary> {
        let categories = self.store.list_categories().await?;
        let stock = self.store.select_stock(&StockQuery::all()).await?;
        let sold = self.store.select_sold(&SoldQuery::all()).await?;

        Ok(summarize(&categories, &stock, &sold))
    }
}
