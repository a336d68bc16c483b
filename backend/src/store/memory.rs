//! In-process store with the same semantics as the PostgreSQL store

use std::collections::HashMap;

use async_trait::async_trait;
use shared::{Category, Sku, SoldRecord, StockUnit, StockUnitPatch};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, InventoryStore, SessionRow, SoldQuery, StockQuery, UserAccount};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct Collections {
    categories: Vec<Category>,
    stock: HashMap<Sku, StockUnit>,
    sold: HashMap<Sku, SoldRecord>,
    users: HashMap<Uuid, UserAccount>,
    sessions: HashMap<Uuid, SessionRow>,
}

/// Store kept behind a single async lock; every call is atomic
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let inner = self.inner.read().await;
        let mut categories = inner.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.categories.iter().any(|c| c.name == category.name) {
            return Err(AppError::conflict("name", "Category name already exists"));
        }
        if inner.categories.iter().any(|c| c.prefix_code == category.prefix_code) {
            return Err(AppError::conflict("prefix_code", "Prefix code already exists"));
        }
        inner.categories.push(category.clone());
        Ok(())
    }

    async fn select_stock(&self, query: &StockQuery) -> AppResult<Vec<StockUnit>> {
        let inner = self.inner.read().await;
        let mut units: Vec<StockUnit> = inner
            .stock
            .values()
            .filter(|u| query.matches(u))
            .cloned()
            .collect();
        units.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(units)
    }

    async fn find_stock(&self, id: &Sku) -> AppResult<Option<StockUnit>> {
        Ok(self.inner.read().await.stock.get(id).cloned())
    }

    async fn insert_stock(&self, unit: &StockUnit) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.stock.contains_key(&unit.id) {
            return Err(AppError::conflict(
                "id",
                format!("Unit {} already in stock", unit.id),
            ));
        }
        if inner.sold.contains_key(&unit.id) {
            return Err(AppError::conflict(
                "id",
                format!("Unit {} has already been sold", unit.id),
            ));
        }
        inner.stock.insert(unit.id.clone(), unit.clone());
        Ok(())
    }

    async fn update_stock(&self, id: &Sku, patch: &StockUnitPatch) -> AppResult<StockUnit> {
        let mut inner = self.inner.write().await;
        let unit = inner
            .stock
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))?;
        unit.apply(patch);
        Ok(unit.clone())
    }

    async fn delete_stock(&self, id: &Sku) -> AppResult<StockUnit> {
        self.inner
            .write()
            .await
            .stock
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))
    }

    async fn select_sold(&self, query: &SoldQuery) -> AppResult<Vec<SoldRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<SoldRecord> = inner
            .sold
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.exited_at.cmp(&a.exited_at).then_with(|| b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn insert_sold(&self, record: &SoldRecord) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.sold.contains_key(&record.id) {
            return Err(AppError::conflict(
                "id",
                format!("Unit {} already in sold ledger", record.id),
            ));
        }
        if inner.stock.contains_key(&record.id) {
            return Err(AppError::conflict(
                "id",
                format!("Unit {} is still in stock", record.id),
            ));
        }
        inner.sold.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete_sold(&self, id: &Sku) -> AppResult<SoldRecord> {
        self.inner
            .write()
            .await
            .sold
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Sold record {}", id)))
    }

    async fn clear_ledgers(&self) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.stock.clear();
        inner.sold.clear();
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, user: &UserAccount) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::conflict("email", "Email already registered"));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn count_users(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.users.len() as i64)
    }

    async fn insert_session(&self, session: &SessionRow) -> AppResult<()> {
        self.inner
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<SessionRow>> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn delete_session(&self, id: Uuid) -> AppResult<()> {
        self.inner
            .write()
            .await
            .sessions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Session".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::Grade;

    fn unit(id: &str) -> StockUnit {
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

    #[tokio::test]
    async fn test_duplicate_stock_insert_conflicts() {
        let store = MemoryStore::new();
        store.insert_stock(&unit("HSA0001")).await.unwrap();
        let err = store.insert_stock(&unit("HSA0001")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_sold_id_cannot_reenter_stock() {
        let store = MemoryStore::new();
        let u = unit("HSA0001");
        store.insert_stock(&u).await.unwrap();
        store.transfer_to_sold(&u, Utc::now()).await.unwrap();

        let err = store.insert_stock(&u).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(store.find_stock(&u.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stocked_id_cannot_enter_sold() {
        let store = MemoryStore::new();
        let u = unit("HSA0001");
        store.insert_stock(&u).await.unwrap();

        let record = SoldRecord::retire(&u, Utc::now());
        let err = store.insert_sold(&record).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(store.select_sold(&SoldQuery::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let id = Sku::parse("HSA0001").unwrap();
        assert!(store.delete_stock(&id).await.unwrap_err().is_not_found());
        assert!(store.delete_sold(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_transfer_moves_unit() {
        let store = MemoryStore::new();
        let u = unit("HSA0001");
        store.insert_stock(&u).await.unwrap();

        let record = store.transfer_to_sold(&u, Utc::now()).await.unwrap();
        assert_eq!(record.id, u.id);
        assert!(store.find_stock(&u.id).await.unwrap().is_none());
        assert_eq!(store.select_sold(&SoldQuery::all()).await.unwrap().len(), 1);
    }
}
