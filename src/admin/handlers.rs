//! User-management HTTP handlers. The request gate only lets admins through.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::CurrentIdentity;
use crate::models::UserResponse;

/// GET /auth/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.admin_service().list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetRoleResponse {
    pub message: String,
    pub user: UserResponse,
}

/// PUT /auth/users/:id/role
pub async fn set_role(
    State(state): State<AppState>,
    CurrentIdentity(actor): CurrentIdentity,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SetRoleRequest>, JsonRejection>,
) -> Result<Json<SetRoleResponse>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let role = body
        .role
        .ok_or_else(|| AppError::Validation("Role is required".to_string()))?;

    let user = state.admin_service().set_role(id, &role).await?;
    info!(actor = %actor.subject, user_id = id, role = %user.role, "role change by admin");

    Ok(Json(SetRoleResponse {
        message: "User role updated successfully".to_string(),
        user: user.into(),
    }))
}

/// DELETE /auth/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentIdentity(actor): CurrentIdentity,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(id) = id?;
    state.admin_service().delete_user(id).await?;
    info!(actor = %actor.subject, user_id = id, "user deleted by admin");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
