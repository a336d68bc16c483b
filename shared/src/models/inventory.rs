//! Active stock models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::types::Sku;
use crate::validation::{validate_brand_model, validate_purchase_price};

/// Cosmetic grade of a second-hand unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    A,
    B,
    C,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(Grade::A),
            "B" | "b" => Some(Grade::B),
            "C" | "c" => Some(Grade::C),
            _ => None,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit currently in stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockUnit {
    /// Immutable identifier, e.g. "HSA0001"
    pub id: Sku,
    /// Category name; immutable after creation
    pub category: String,
    pub brand_model: String,
    pub grade: Grade,
    pub purchase_price: Decimal,
    /// Free-text condition notes
    pub condition: String,
    pub created_at: DateTime<Utc>,
}

impl StockUnit {
    /// Fields printed on a thermal label
    pub fn label(&self) -> StockLabel {
        StockLabel {
            id: self.id.clone(),
            brand_model: self.brand_model.clone(),
            grade: self.grade,
            price: self.purchase_price,
            condition: self.condition.clone(),
        }
    }

    /// Apply a validated patch to the mutable fields
    pub fn apply(&mut self, patch: &StockUnitPatch) {
        if let Some(brand_model) = &patch.brand_model {
            self.brand_model = brand_model.clone();
        }
        if let Some(grade) = patch.grade {
            self.grade = grade;
        }
        if let Some(price) = patch.purchase_price {
            self.purchase_price = price;
        }
        if let Some(condition) = &patch.condition {
            self.condition = condition.clone();
        }
    }
}

/// Input for registering a new unit; the identifier is generated
#[derive(Debug, Clone, Deserialize)]
pub struct NewStockUnit {
    pub category: String,
    pub brand_model: String,
    #[serde(default)]
    pub grade: Grade,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub condition: Option<String>,
}

impl NewStockUnit {
    pub fn normalized(&self) -> DomainResult<NewStockUnit> {
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(DomainError::validation("category", "Category must not be empty"));
        }
        validate_brand_model(&self.brand_model)
            .map_err(|m| DomainError::validation("brand_model", m))?;
        validate_purchase_price(self.purchase_price)
            .map_err(|m| DomainError::validation("purchase_price", m))?;

        Ok(NewStockUnit {
            category,
            brand_model: self.brand_model.trim().to_string(),
            grade: self.grade,
            purchase_price: self.purchase_price,
            condition: self
                .condition
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }

    pub fn into_unit(self, id: Sku, created_at: DateTime<Utc>) -> StockUnit {
        StockUnit {
            id,
            category: self.category,
            brand_model: self.brand_model,
            grade: self.grade,
            purchase_price: self.purchase_price,
            condition: self.condition.unwrap_or_default(),
            created_at,
        }
    }
}

/// Update to the mutable fields of a unit
///
/// `id` and `category` are not part of the patch; unknown fields are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StockUnitPatch {
    pub brand_model: Option<String>,
    pub grade: Option<Grade>,
    pub purchase_price: Option<Decimal>,
    pub condition: Option<String>,
}

impl StockUnitPatch {
    pub fn is_empty(&self) -> bool {
        self.brand_model.is_none()
            && self.grade.is_none()
            && self.purchase_price.is_none()
            && self.condition.is_none()
    }

    pub fn normalized(&self) -> DomainResult<StockUnitPatch> {
        if self.is_empty() {
            return Err(DomainError::validation("patch", "Nothing to update"));
        }
        let brand_model = match &self.brand_model {
            Some(bm) => {
                validate_brand_model(bm).map_err(|m| DomainError::validation("brand_model", m))?;
                Some(bm.trim().to_string())
            }
            None => None,
        };
        if let Some(price) = self.purchase_price {
            validate_purchase_price(price)
                .map_err(|m| DomainError::validation("purchase_price", m))?;
        }

        Ok(StockUnitPatch {
            brand_model,
            grade: self.grade,
            purchase_price: self.purchase_price,
            condition: self.condition.as_ref().map(|c| c.trim().to_string()),
        })
    }
}

/// Data handed to the label printer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockLabel {
    pub id: Sku,
    pub brand_model: String,
    pub grade: Grade,
    pub price: Decimal,
    pub condition: String,
}
