//! Shared application state and the liveness endpoint.

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::JwtSecret;
use crate::db::UserStore;
use crate::services::{AdminService, AuthService};

/// Shared application state for all HTTP handlers and the request gate.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub admin_service: AdminService,
    pub jwt_secret: JwtSecret,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, jwt_secret: JwtSecret) -> Self {
        Self {
            auth_service: AuthService::new(store.clone(), jwt_secret.clone()),
            admin_service: AdminService::new(store),
            jwt_secret,
        }
    }

    pub fn jwt_secret(&self) -> &JwtSecret {
        &self.jwt_secret
    }
    pub fn auth_service(&self) -> &AuthService {
        &self.auth_service
    }
    pub fn admin_service(&self) -> &AdminService {
        &self.admin_service
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "authsvc" })),
    )
}
