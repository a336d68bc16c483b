//! HTTP handlers for the category registry

use axum::{extract::State, http::StatusCode, Json};
use shared::{Category, NewCategory};

use crate::error::AppResult;
use crate::AppState;

/// List categories in name order
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories().list().await?;
    Ok(Json(categories))
}

/// Add a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.categories().add(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
