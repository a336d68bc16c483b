//! PostgreSQL store
//!
//! Rows are decoded into validated domain structs here, so a malformed row
//! is rejected at the boundary instead of deep inside a service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Category, Grade, Sku, SoldRecord, StockUnit, StockUnitPatch};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{AccountStore, InventoryStore, SessionRow, SoldQuery, StockQuery, UserAccount};
use crate::error::{AppError, AppResult};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// Create a new PgStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    prefix_code: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            prefix_code: row.prefix_code,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct StockRow {
    id: String,
    category: String,
    brand_model: String,
    grade: String,
    purchase_price: Decimal,
    condition: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<StockRow> for StockUnit {
    type Error = AppError;

    fn try_from(row: StockRow) -> Result<Self, Self::Error> {
        let id = Sku::parse(&row.id)
            .map_err(|e| AppError::Internal(format!("Malformed inventory row: {}", e)))?;
        let grade = Grade::parse(&row.grade).ok_or_else(|| {
            AppError::Internal(format!("Malformed grade {:?} on unit {}", row.grade, id))
        })?;
        if row.purchase_price < Decimal::ZERO {
            return Err(AppError::Internal(format!("Negative price on unit {}", id)));
        }

        Ok(StockUnit {
            id,
            category: row.category,
            brand_model: row.brand_model,
            grade,
            purchase_price: row.purchase_price,
            condition: row.condition,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SoldRow {
    id: String,
    brand_model: String,
    sale_price_basis: Decimal,
    exited_at: DateTime<Utc>,
}

impl TryFrom<SoldRow> for SoldRecord {
    type Error = AppError;

    fn try_from(row: SoldRow) -> Result<Self, Self::Error> {
        let id = Sku::parse(&row.id)
            .map_err(|e| AppError::Internal(format!("Malformed inventory_out row: {}", e)))?;
        Ok(SoldRecord {
            id,
            brand_model: row.brand_model,
            sale_price_basis: row.sale_price_basis,
            exited_at: row.exited_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        UserAccount {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SessionDbRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionDbRow> for SessionRow {
    fn from(row: SessionDbRow) -> Self {
        SessionRow {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Map a unique-key violation to `Conflict`, anything else to `DatabaseError`
fn conflict_or_db(err: sqlx::Error, resource: &str, message: String) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(resource, message),
        _ => AppError::DatabaseError(err),
    }
}

const STOCK_COLUMNS: &str =
    r#"id, category, brand_model, grade, purchase_price, "condition", created_at"#;

#[async_trait]
impl InventoryStore for PgStore {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, prefix_code, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO categories (id, name, prefix_code, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.prefix_code)
        .bind(category.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            conflict_or_db(
                e,
                "category",
                format!(
                    "Category {} or prefix {} already exists",
                    category.name, category.prefix_code
                ),
            )
        })?;

        Ok(())
    }

    async fn select_stock(&self, query: &StockQuery) -> AppResult<Vec<StockUnit>> {
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            r#"
            SELECT {}
            FROM inventory
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR left(id, length($2)) = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            STOCK_COLUMNS
        ))
        .bind(query.category.as_deref())
        .bind(query.id_prefix.as_deref())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockUnit::try_from).collect()
    }

    async fn find_stock(&self, id: &Sku) -> AppResult<Option<StockUnit>> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {} FROM inventory WHERE id = $1",
            STOCK_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.db)
        .await?;

        row.map(StockUnit::try_from).transpose()
    }

    async fn insert_stock(&self, unit: &StockUnit) -> AppResult<()> {
        let inserted = sqlx::query(&format!(
            r#"
            INSERT INTO inventory ({})
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE NOT EXISTS (SELECT 1 FROM inventory_out WHERE id = $1)
            "#,
            STOCK_COLUMNS
        ))
        .bind(unit.id.as_str())
        .bind(&unit.category)
        .bind(&unit.brand_model)
        .bind(unit.grade.as_str())
        .bind(unit.purchase_price)
        .bind(&unit.condition)
        .bind(unit.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| conflict_or_db(e, "id", format!("Unit {} already in stock", unit.id)))?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::conflict(
                "id",
                format!("Unit {} has already been sold", unit.id),
            ));
        }

        Ok(())
    }

    async fn update_stock(&self, id: &Sku, patch: &StockUnitPatch) -> AppResult<StockUnit> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            r#"
            UPDATE inventory
            SET brand_model = COALESCE($2, brand_model),
                grade = COALESCE($3, grade),
                purchase_price = COALESCE($4, purchase_price),
                "condition" = COALESCE($5, "condition")
            WHERE id = $1
            RETURNING {}
            "#,
            STOCK_COLUMNS
        ))
        .bind(id.as_str())
        .bind(patch.brand_model.as_deref())
        .bind(patch.grade.map(|g| g.as_str()))
        .bind(patch.purchase_price)
        .bind(patch.condition.as_deref())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))?;

        StockUnit::try_from(row)
    }

    async fn delete_stock(&self, id: &Sku) -> AppResult<StockUnit> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            "DELETE FROM inventory WHERE id = $1 RETURNING {}",
            STOCK_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))?;

        StockUnit::try_from(row)
    }

    async fn select_sold(&self, query: &SoldQuery) -> AppResult<Vec<SoldRecord>> {
        let rows = sqlx::query_as::<_, SoldRow>(
            r#"
            SELECT id, brand_model, sale_price_basis, exited_at
            FROM inventory_out
            WHERE ($1::text IS NULL OR left(id, length($1)) = $1)
            ORDER BY exited_at DESC, id DESC
            "#,
        )
        .bind(query.id_prefix.as_deref())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(SoldRecord::try_from).collect()
    }

    async fn insert_sold(&self, record: &SoldRecord) -> AppResult<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO inventory_out (id, brand_model, sale_price_basis, exited_at)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (SELECT 1 FROM inventory WHERE id = $1)
            "#,
        )
        .bind(record.id.as_str())
        .bind(&record.brand_model)
        .bind(record.sale_price_basis)
        .bind(record.exited_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            conflict_or_db(e, "id", format!("Unit {} already in sold ledger", record.id))
        })?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::conflict(
                "id",
                format!("Unit {} is still in stock", record.id),
            ));
        }

        Ok(())
    }

    async fn delete_sold(&self, id: &Sku) -> AppResult<SoldRecord> {
        let row = sqlx::query_as::<_, SoldRow>(
            "DELETE FROM inventory_out WHERE id = $1 RETURNING id, brand_model, sale_price_basis, exited_at",
        )
        .bind(id.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sold record {}", id)))?;

        SoldRecord::try_from(row)
    }

    async fn clear_ledgers(&self) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM inventory").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM inventory_out").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    /// Both writes share one transaction, so there is no partial state to repair
    async fn transfer_to_sold(
        &self,
        unit: &StockUnit,
        exited_at: DateTime<Utc>,
    ) -> AppResult<SoldRecord> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, StockRow>(&format!(
            "DELETE FROM inventory WHERE id = $1 RETURNING {}",
            STOCK_COLUMNS
        ))
        .bind(unit.id.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {}", unit.id)))?;

        let removed = StockUnit::try_from(row)?;
        let record = SoldRecord::retire(&removed, exited_at);

        sqlx::query(
            "INSERT INTO inventory_out (id, brand_model, sale_price_basis, exited_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(record.id.as_str())
        .bind(&record.brand_model)
        .bind(record.sale_price_basis)
        .bind(record.exited_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            conflict_or_db(e, "id", format!("Unit {} already in sold ledger", record.id))
        })?;

        tx.commit().await?;
        Ok(record)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, is_active, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(UserAccount::from))
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(UserAccount::from))
    }

    async fn insert_user(&self, user: &UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| conflict_or_db(e, "email", "Email already registered".to_string()))?;

        Ok(())
    }

    async fn count_users(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn insert_session(&self, session: &SessionRow) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<SessionRow>> {
        let row = sqlx::query_as::<_, SessionDbRow>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(SessionRow::from))
    }

    async fn delete_session(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Session".to_string()));
        }

        Ok(())
    }
}
