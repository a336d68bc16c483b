//! Business logic services for the Stockroom platform

pub mod admin;
pub mod auth;
pub mod category;
pub mod checkout;
pub mod reporting;
pub mod sold;
pub mod stock;

pub use admin::AdminService;
pub use auth::AuthService;
pub use category::CategoryRegistry;
pub use checkout::{CheckoutService, Confirmation};
pub use reporting::ReportingService;
pub use sold::SoldLedger;
pub use stock::StockLedger;
