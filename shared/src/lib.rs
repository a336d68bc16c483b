//! Shared types and domain logic for the Stockroom inventory platform
//!
//! This crate contains the identity and ledger rules shared between the backend,
//! the browser client (via WASM), and tests. Nothing in here performs IO.

pub mod aggregate;
pub mod error;
pub mod identifier;
pub mod models;
pub mod scan;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
