//! Minimal authentication microservice built with Rust.
//!
//! Registers users, verifies credentials, issues HS256 session tokens and
//! exposes admin management of user records behind a role-checking gate.

pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::{AdminService, AuthService};

use axum::routing::{delete, get, post, put};
use handlers::http;

/// Build the API router with the request gate in front of every route.
/// Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(http::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/users", get(admin::list_users))
        .route("/auth/users/:id", delete(admin::delete_user))
        .route("/auth/users/:id/role", put(admin::set_role))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_gate,
        ))
        .with_state(state)
}
