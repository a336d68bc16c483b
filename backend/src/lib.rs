//! Stockroom - inventory identity and ledger engine
//!
//! Tracks physical units (phones, laptops, tablets) from stock to sold:
//! category-scoped sequential identifiers, an atomic checkout transition, and
//! dashboard aggregates recomputed from the two ledgers on every read.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use services::{AuthService, CategoryRegistry, CheckoutService, ReportingService, SoldLedger, StockLedger};
use store::{AccountStore, InventoryStore, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn InventoryStore>, accounts: Arc<dyn AccountStore>, config: Config) -> Self {
        Self {
            store,
            accounts,
            config: Arc::new(config),
        }
    }

    /// State backed by a single in-process store
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, config)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.accounts.clone(), &self.config)
    }

    pub fn categories(&self) -> CategoryRegistry {
        CategoryRegistry::new(self.store.clone())
    }

    pub fn stock_ledger(&self) -> StockLedger {
        StockLedger::new(self.store.clone())
            .with_sold_reservation(self.config.inventory.reserve_sold_sequences)
    }

    pub fn sold_ledger(&self) -> SoldLedger {
        SoldLedger::new(self.store.clone())
    }

    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.store.clone())
            .with_scan_min_length(self.config.inventory.scan_min_length)
    }

    pub fn reporting(&self) -> ReportingService {
        ReportingService::new(self.store.clone())
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stockroom Inventory API v1"
}
