//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::auth::{Session, SignInResponse};
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Sign-in endpoint handler
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    body.validate()?;

    let response = state.auth().sign_in(&body.email, &body.password).await?;
    Ok(Json(response))
}

/// Current session endpoint handler
pub async fn current_session(current_user: CurrentUser) -> Json<Session> {
    Json(current_user.0)
}

/// Sign-out endpoint handler
pub async fn sign_out(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.auth().sign_out(current_user.0.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
