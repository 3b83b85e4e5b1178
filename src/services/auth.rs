//! Registration and login: password policy, hashing, and token issuance.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use validator::ValidateEmail;

use crate::auth::{hash_password, verify_against_dummy, verify_password, Identity, JwtSecret};
use crate::db::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, ROLE_ADMIN, ROLE_USER};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Input to [`AuthService::register`]. There is no role field: new users are always `USER`.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Canonical login response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    jwt: JwtSecret,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, jwt: JwtSecret) -> Self {
        Self { store, jwt }
    }

    pub fn jwt(&self) -> &JwtSecret {
        &self.jwt
    }

    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        self.create_user(registration, ROLE_USER).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                verify_against_dummy(password);
                warn!(email = %email, "login failed: unknown email");
                return Err(AppError::invalid_credentials());
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!(email = %email, "login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }

        let token = self.jwt.issue(&user.email, &user.role, Utc::now())?;
        info!(user_id = user.id, role = %user.role, "login succeeded");

        Ok(AuthResponse {
            token,
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            role: user.role,
        })
    }

    /// Resolve the stored record behind an authenticated identity.
    pub async fn current_user(&self, identity: &Identity) -> AppResult<User> {
        self.store
            .find_by_email(&identity.subject)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Create the bootstrap administrator unless the email is already registered.
    /// Returns whether a user was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<bool> {
        if self.store.find_by_email(email).await?.is_some() {
            return Ok(false);
        }
        let registration = Registration {
            email: email.to_string(),
            password: password.to_string(),
            display_name: "Administrator".to_string(),
        };
        match self.create_user(registration, ROLE_ADMIN).await {
            Ok(_) => Ok(true),
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_user(&self, registration: Registration, role: &str) -> AppResult<User> {
        validate_registration(&registration)?;

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .store
            .insert(NewUser {
                email: registration.email,
                password_hash,
                role: role.to_string(),
                display_name: registration.display_name.trim().to_string(),
            })
            .await?;

        info!(user_id = user.id, email = %user.email, role = %user.role, "user registered");
        Ok(user)
    }
}

fn validate_registration(registration: &Registration) -> AppResult<()> {
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !registration.email.as_str().validate_email() {
        return Err(AppError::Validation("Invalid email".to_string()));
    }
    if registration.display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name is required".to_string()));
    }
    Ok(())
}
