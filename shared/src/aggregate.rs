//! Aggregate statistics derived from ledger snapshots
//!
//! Everything here is recomputed from the snapshots passed in; no running
//! totals are stored anywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Category, SoldRecord, StockUnit};

/// Sum of purchase prices over the active stock
pub fn total_active_value(stock: &[StockUnit]) -> Decimal {
    stock.iter().map(|u| u.purchase_price).sum()
}

/// Sum of sale price bases over the sold ledger
pub fn total_sold_value(sold: &[SoldRecord]) -> Decimal {
    sold.iter().map(|r| r.sale_price_basis).sum()
}

/// Number of active units in the named category
pub fn count_by_category(stock: &[StockUnit], category_name: &str) -> usize {
    stock.iter().filter(|u| u.category == category_name).count()
}

/// Number of sold records whose identifier starts with `prefix`
pub fn count_sold_by_category_prefix(sold: &[SoldRecord], prefix: &str) -> usize {
    sold.iter().filter(|r| r.id.starts_with(prefix)).count()
}

/// Per-category line of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub prefix_code: String,
    pub in_stock: usize,
    pub sold: usize,
}

/// Dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventorySummary {
    pub total_active_value: Decimal,
    pub total_sold_value: Decimal,
    pub active_count: usize,
    pub sold_count: usize,
    pub categories: Vec<CategorySummary>,
}

/// Build the dashboard statistics from fresh snapshots
pub fn summarize(categories: &[Category], stock: &[StockUnit], sold: &[SoldRecord]) -> InventorySummary {
    InventorySummary {
        total_active_value: total_active_value(stock),
        total_sold_value: total_sold_value(sold),
        active_count: stock.len(),
        sold_count: sold.len(),
        categories: categories
            .iter()
            .map(|c| CategorySummary {
                name: c.name.clone(),
                prefix_code: c.prefix_code.clone(),
                in_stock: count_by_category(stock, &c.name),
                sold: count_sold_by_category_prefix(sold, &c.prefix_code),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;
    use crate::types::Sku;
    use chrono::Utc;
    use uuid::Uuid;

    fn unit(id: &str, category: &str, price: i64) -> StockUnit {
        StockUnit {
            id: Sku::parse(id).unwrap(),
            category: category.to_string(),
            brand_model: "Unit".to_string(),
            grade: Grade::B,
            purchase_price: Decimal::new(price, 0),
            condition: String::new(),
            created_at: Utc::now(),
        }
    }

    fn sold(id: &str, price: i64) -> SoldRecord {
        SoldRecord::retire(&unit(id, "any", price), Utc::now())
    }

    #[test]
    fn test_empty_ledgers() {
        assert_eq!(total_active_value(&[]), Decimal::ZERO);
        assert_eq!(total_sold_value(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_summarize() {
        let categories = vec![
            Category {
                id: Uuid::new_v4(),
                name: "Handphone".to_string(),
                prefix_code: "H".to_string(),
                created_at: Utc::now(),
            },
            Category {
                id: Uuid::new_v4(),
                name: "Laptop".to_string(),
                prefix_code: "L".to_string(),
                created_at: Utc::now(),
            },
        ];
        let stock = vec![
            unit("HSA0002", "Handphone", 3_000_000),
            unit("LAS0001", "Laptop", 7_500_000),
        ];
        let sold = vec![sold("HSA0001", 2_000_000)];

        let summary = summarize(&categories, &stock, &sold);
        assert_eq!(summary.total_active_value, Decimal::new(10_500_000, 0));
        assert_eq!(summary.total_sold_value, Decimal::new(2_000_000, 0));
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.categories[0].in_stock, 1);
        assert_eq!(summary.categories[0].sold, 1);
        assert_eq!(summary.categories[1].sold, 0);
    }
}
