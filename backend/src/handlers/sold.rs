//! HTTP handlers for the sold ledger

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{Sku, SoldRecord};

use crate::error::AppResult;
use crate::AppState;

/// Sold history, most recent exit first
pub async fn list_sold(State(state): State<AppState>) -> AppResult<Json<Vec<SoldRecord>>> {
    let records = state.sold_ledger().all().await?;
    Ok(Json(records))
}

/// Delete a sold record
pub async fn delete_sold(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = Sku::parse(&id)?;
    state.sold_ledger().remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
