//! Auth HTTP handlers: register, login, me.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::CurrentIdentity;
use crate::models::UserResponse;
use crate::services::{AuthResponse, Registration};

/// Missing fields deserialize as empty strings so they fail validation with a 400.
/// Unknown fields (including any `role`) are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Json(body) = payload?;
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .auth_service()
        .register(Registration {
            email: body.email,
            password: body.password,
            display_name: body.display_name,
        })
        .await?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    }))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(body) = payload?;
    let response = state.auth_service().login(&body.email, &body.password).await?;
    Ok(Json(response))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth_service().current_user(&identity).await?;
    Ok(Json(user.into()))
}
