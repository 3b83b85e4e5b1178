//! User record and its outward-facing view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Role assigned on registration.
pub const ROLE_USER: &str = "USER";
/// Role required by the user-management routes.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Stored identity record. Never serialized directly: the hash stays inside the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a user; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub display_name: String,
}

/// Public view of a user (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub display_name: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            display_name: user.display_name,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

pub fn is_admin_role(role: &str) -> bool {
    role.eq_ignore_ascii_case(ROLE_ADMIN)
}

/// Canonical stored form of a role tag: trimmed and upper-cased. `None` when blank.
pub fn normalize_role(role: &str) -> Option<String> {
    let role = role.trim();
    if role.is_empty() {
        None
    } else {
        Some(role.to_ascii_uppercase())
    }
}
