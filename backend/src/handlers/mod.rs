//! HTTP request handlers

pub mod admin;
pub mod auth;
pub mod category;
pub mod checkout;
pub mod health;
pub mod inventory;
pub mod reporting;
pub mod sold;

pub use admin::*;
pub use auth::*;
pub use category::*;
pub use checkout::*;
pub use health::*;
pub use inventory::*;
pub use reporting::*;
pub use sold::*;
