//! Business logic: registration/login and admin user management.

pub mod admin;
pub mod auth;

pub use admin::AdminService;
pub use auth::{AuthResponse, AuthService, Registration, MIN_PASSWORD_LENGTH};
