//! HTTP handlers for the stock ledger

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{NewStockUnit, Sku, StockLabel, StockUnit, StockUnitPatch};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListStockQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NextIdQuery {
    pub category: String,
    pub brand_model: String,
}

#[derive(Debug, Serialize)]
pub struct NextIdResponse {
    pub id: Sku,
}

/// List active units, optionally limited to one category
pub async fn list_stock(
    State(state): State<AppState>,
    Query(query): Query<ListStockQuery>,
) -> AppResult<Json<Vec<StockUnit>>> {
    let ledger = state.stock_ledger();
    let units = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => ledger.in_category(category).await?,
        _ => ledger.all().await?,
    };
    Ok(Json(units))
}

/// Register a unit under a generated identifier
pub async fn register_unit(
    State(state): State<AppState>,
    Json(input): Json<NewStockUnit>,
) -> AppResult<(StatusCode, Json<StockUnit>)> {
    let unit = state.stock_ledger().register(input).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Preview the identifier the next registration would receive
pub async fn preview_next_id(
    State(state): State<AppState>,
    Query(query): Query<NextIdQuery>,
) -> AppResult<Json<NextIdResponse>> {
    let id = state
        .stock_ledger()
        .next_identifier(&query.category, &query.brand_model)
        .await?;
    Ok(Json(NextIdResponse { id }))
}

/// Get one active unit
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StockUnit>> {
    let id = Sku::parse(&id)?;
    let unit = state
        .stock_ledger()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))?;
    Ok(Json(unit))
}

/// Update the mutable fields of a unit
pub async fn update_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<StockUnitPatch>,
) -> AppResult<Json<StockUnit>> {
    let id = Sku::parse(&id)?;
    let unit = state.stock_ledger().update(&id, patch).await?;
    Ok(Json(unit))
}

/// Remove a unit from stock without selling it
pub async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = Sku::parse(&id)?;
    state.stock_ledger().remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Label fields for a thermal printer
pub async fn get_label(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StockLabel>> {
    let id = Sku::parse(&id)?;
    let unit = state
        .stock_ledger()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {}", id)))?;
    Ok(Json(unit.label()))
}
