//! Sold ledger models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StockUnit;
use crate::types::Sku;

/// A unit that has left stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoldRecord {
    /// Identifier copied from the retired unit
    pub id: Sku,
    pub brand_model: String,
    /// Purchase price of the unit at exit time
    pub sale_price_basis: Decimal,
    pub exited_at: DateTime<Utc>,
}

impl SoldRecord {
    /// Ledger entry for a unit leaving stock at `exited_at`
    pub fn retire(unit: &StockUnit, exited_at: DateTime<Utc>) -> Self {
        Self {
            id: unit.id.clone(),
            brand_model: unit.brand_model.clone(),
            sale_price_basis: unit.purchase_price,
            exited_at,
        }
    }
}
