//! WebAssembly module for the Stockroom inventory client
//!
//! Provides client-side computation for:
//! - Identifier previews while filling the registration form
//! - Scanner input matching against the active stock list
//! - Dashboard totals from cached ledger snapshots

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use shared::aggregate::summarize;
use shared::identifier::next_for_prefix;
use shared::scan::{ScanBuffer, ScanState};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Normalize raw scanner input (trim and uppercase)
#[wasm_bindgen]
pub fn normalize_scan_input(raw: &str) -> String {
    normalize_scan(raw)
}

/// Identifier the next unit would receive given the identifiers already taken
#[wasm_bindgen]
pub fn preview_identifier(
    prefix_code: &str,
    brand_model: &str,
    existing_ids_json: &str,
) -> Result<String, JsValue> {
    preview(prefix_code, brand_model, existing_ids_json).map_err(|e| JsValue::from_str(&e))
}

/// Dashboard summary as JSON from category, stock and sold snapshots
#[wasm_bindgen]
pub fn summarize_dashboard(
    categories_json: &str,
    stock_json: &str,
    sold_json: &str,
) -> Result<String, JsValue> {
    dashboard(categories_json, stock_json, sold_json).map_err(|e| JsValue::from_str(&e))
}

fn parse_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn preview(prefix_code: &str, brand_model: &str, existing_ids_json: &str) -> Result<String, String> {
    let existing: Vec<Sku> = parse_json("identifier list", existing_ids_json)?;
    next_for_prefix(prefix_code, brand_model, &existing)
        .map(|id| id.to_string())
        .map_err(|e| e.to_string())
}

fn dashboard(categories_json: &str, stock_json: &str, sold_json: &str) -> Result<String, String> {
    let categories: Vec<Category> = parse_json("category", categories_json)?;
    let stock: Vec<StockUnit> = parse_json("stock", stock_json)?;
    let sold: Vec<SoldRecord> = parse_json("sold", sold_json)?;

    let summary = summarize(&categories, &stock, &sold);
    serde_json::to_string(&summary).map_err(|e| e.to_string())
}

/// Scanner field state kept on the client
///
/// `input` returns the matched identifier once the buffer exactly equals an
/// active one. The buffer clears itself after a match.
#[wasm_bindgen]
pub struct ScanMatcher {
    buffer: ScanBuffer,
    active: Vec<Sku>,
}

#[wasm_bindgen]
impl ScanMatcher {
    #[wasm_bindgen(constructor)]
    pub fn new(min_length: usize) -> ScanMatcher {
        ScanMatcher {
            buffer: ScanBuffer::new(min_length),
            active: Vec::new(),
        }
    }

    /// Replace the active identifier list from a JSON array of strings
    pub fn set_active_ids(&mut self, ids_json: &str) -> Result<(), JsValue> {
        self.load_active(ids_json).map_err(|e| JsValue::from_str(&e))
    }

    /// Feed the current text field value
    pub fn input(&mut self, value: &str) -> Option<String> {
        self.buffer.set(value);
        match self.buffer.evaluate(&self.active) {
            ScanState::Match(id) => {
                self.buffer.reset();
                Some(id.to_string())
            }
            ScanState::Pending | ScanState::NoMatch => None,
        }
    }

    pub fn reset(&mut self) {
        self.buffer.reset();
    }
}

impl ScanMatcher {
    fn load_active(&mut self, ids_json: &str) -> Result<(), String> {
        self.active = parse_json("identifier list", ids_json)?;
        Ok(())
    }
}
