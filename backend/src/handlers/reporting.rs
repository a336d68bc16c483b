//! Dashboard reporting handlers

use axum::{extract::State, Json};
use shared::aggregate::InventorySummary;

use crate::error::AppResult;
use crate::AppState;

/// Aggregate totals recomputed from both ledgers
pub async fn get_summary(State(state): State<AppState>) -> AppResult<Json<InventorySummary>> {
    let summary = state.reporting().summary().await?;
    Ok(Json(summary))
}
