//! Administrative handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::AdminService;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct ResetRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

/// Empty both ledgers after a password re-check
pub async fn reset_ledgers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<ResetRequest>,
) -> AppResult<StatusCode> {
    body.validate()?;

    let service = AdminService::new(state.store.clone(), state.auth());
    service
        .reset_ledgers(current_user.0.user_id, &body.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
