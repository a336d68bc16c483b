//! Administrative ledger maintenance

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppResult;
use crate::services::auth::AuthService;
use crate::store::InventoryStore;

/// Administrative operations that need a password re-check
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn InventoryStore>,
    auth: AuthService,
}

impl AdminService {
    pub fn new(store: Arc<dyn InventoryStore>, auth: AuthService) -> Self {
        Self { store, auth }
    }

    /// Empty the stock and sold ledgers after re-verifying the password
    ///
    /// Categories survive. A wrong password fails with `InvalidCredentials`
    /// and leaves both ledgers untouched.
    pub async fn reset_ledgers(&self, user_id: Uuid, password: &str) -> AppResult<()> {
        self.auth.verify_password(user_id, password).await?;
        self.store.clear_ledgers().await?;
        tracing::warn!("Stock and sold ledgers reset by user {}", user_id);
        Ok(())
    }
}
