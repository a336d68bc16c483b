//! Storage abstraction over the three collections and the account tables
//!
//! Services only see these traits. `PgStore` backs them with PostgreSQL and
//! `MemoryStore` keeps everything in process for tests and demos. Both must
//! enforce key uniqueness on insert and report missing keys on update/delete,
//! since those checks are what serialize racing checkouts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Category, Sku, SoldRecord, StockUnit, StockUnitPatch};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Filter for the `inventory` collection
#[derive(Debug, Clone, Default)]
pub struct StockQuery {
    pub category: Option<String>,
    pub id_prefix: Option<String>,
}

impl StockQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            id_prefix: None,
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            category: None,
            id_prefix: Some(prefix.into()),
        }
    }

    pub fn matches(&self, unit: &StockUnit) -> bool {
        self.category.as_deref().map_or(true, |c| unit.category == c)
            && self.id_prefix.as_deref().map_or(true, |p| unit.id.starts_with(p))
    }
}

/// Filter for the `inventory_out` collection
#[derive(Debug, Clone, Default)]
pub struct SoldQuery {
    pub id_prefix: Option<String>,
}

impl SoldQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: Some(prefix.into()),
        }
    }

    pub fn matches(&self, record: &SoldRecord) -> bool {
        self.id_prefix.as_deref().map_or(true, |p| record.id.starts_with(p))
    }
}

/// Stored login account
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Server-side half of a signed-in session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Categories, stock ledger and sold ledger
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Categories ordered by name
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Fails with `Conflict` on a duplicate name or prefix code
    async fn insert_category(&self, category: &Category) -> AppResult<()>;

    /// Matching units, newest first
    async fn select_stock(&self, query: &StockQuery) -> AppResult<Vec<StockUnit>>;

    async fn find_stock(&self, id: &Sku) -> AppResult<Option<StockUnit>>;

    /// Fails with `Conflict` if the id is already in stock or in the sold ledger
    async fn insert_stock(&self, unit: &StockUnit) -> AppResult<()>;

    /// Fails with `NotFound` if the id is absent
    async fn update_stock(&self, id: &Sku, patch: &StockUnitPatch) -> AppResult<StockUnit>;

    /// Fails with `NotFound` if the id is absent
    async fn delete_stock(&self, id: &Sku) -> AppResult<StockUnit>;

    /// Matching records, most recent exit first
    async fn select_sold(&self, query: &SoldQuery) -> AppResult<Vec<SoldRecord>>;

    /// Fails with `Conflict` if the id is already sold or still in stock
    async fn insert_sold(&self, record: &SoldRecord) -> AppResult<()>;

    /// Fails with `NotFound` if the id is absent
    async fn delete_sold(&self, id: &Sku) -> AppResult<SoldRecord>;

    /// Empty both ledgers; categories are kept
    async fn clear_ledgers(&self) -> AppResult<()>;

    /// Connectivity probe for health checks
    async fn ping(&self) -> AppResult<()>;

    /// Move `unit` from the stock ledger to the sold ledger
    ///
    /// The delete comes first so that of two racing callers only one gets
    /// past it; the other sees `NotFound`. If the append then fails the unit
    /// is put back. When that also fails the ledgers disagree and the caller
    /// gets `InconsistentLedger`.
    async fn transfer_to_sold(
        &self,
        unit: &StockUnit,
        exited_at: DateTime<Utc>,
    ) -> AppResult<SoldRecord> {
        let removed = self.delete_stock(&unit.id).await?;
        let record = SoldRecord::retire(&removed, exited_at);

        match self.insert_sold(&record).await {
            Ok(()) => Ok(record),
            Err(append_err) => {
                tracing::warn!(
                    "Sold append for {} failed ({}), restoring stock unit",
                    removed.id,
                    append_err
                );
                match self.insert_stock(&removed).await {
                    Ok(()) => Err(append_err),
                    Err(restore_err) => {
                        tracing::error!(
                            "Unit {} removed from stock but not recorded as sold: {}; restore failed: {}",
                            removed.id,
                            append_err,
                            restore_err
                        );
                        Err(AppError::InconsistentLedger {
                            id: removed.id.to_string(),
                            message: format!(
                                "append failed ({}), restore failed ({})",
                                append_err, restore_err
                            ),
                        })
                    }
                }
            }
        }
    }
}

/// Login accounts and sessions
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserAccount>>;

    /// Fails with `Conflict` on a duplicate email
    async fn insert_user(&self, user: &UserAccount) -> AppResult<()>;

    async fn count_users(&self) -> AppResult<i64>;

    async fn insert_session(&self, session: &SessionRow) -> AppResult<()>;

    async fn find_session(&self, id: Uuid) -> AppResult<Option<SessionRow>>;

    /// Fails with `NotFound` if the session is absent
    async fn delete_session(&self, id: Uuid) -> AppResult<()>;
}
