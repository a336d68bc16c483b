//! HTTP handlers for the checkout transition
//!
//! The caller confirms up front; `confirmed: false` behaves like a declined
//! prompt and leaves both ledgers untouched.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::checkout::{CheckoutOutcome, ScanOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub id: String,
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub buffer: String,
    #[serde(default)]
    pub confirmed: bool,
}

/// Manual checkout by identifier
pub async fn checkout_unit(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutOutcome>> {
    let outcome = state.checkout().checkout(&body.id, &body.confirmed).await?;
    Ok(Json(outcome))
}

/// Scanner-driven checkout for the current input buffer
pub async fn scan_checkout(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> AppResult<Json<ScanOutcome>> {
    let outcome = state.checkout().scan(&body.buffer, &body.confirmed).await?;
    Ok(Json(outcome))
}
