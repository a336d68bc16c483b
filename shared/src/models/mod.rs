//! Domain models for the Stockroom platform

mod category;
mod inventory;
mod sold;

pub use category::*;
pub use inventory::*;
pub use sold::*;
