//! User repository: the persistence interface and its PostgreSQL implementation.

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use async_trait::async_trait;

use super::DbPool;

/// Message surfaced when the unique email constraint rejects an insert.
pub const DUPLICATE_EMAIL: &str = "Email address already registered";

/// Persistence for user records keyed by unique email.
///
/// Uniqueness and atomicity are the backend's job; callers never lock.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Create a user. Fails with `AppError::Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Persist the mutable fields of an existing user.
    async fn save(&self, user: &User) -> AppResult<()>;

    /// Returns `false` when no row was deleted.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    async fn find_all(&self) -> AppResult<Vec<User>>;
}

const USER_COLUMNS: &str = "id, email, password_hash, role, display_name, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, role, display_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(DUPLICATE_EMAIL.to_string())
            }
            other => AppError::Db(other),
        })?;
        Ok(row)
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let r = sqlx::query("UPDATE users SET role = $1, display_name = $2 WHERE id = $3")
            .bind(&user.role)
            .bind(&user.display_name)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        if r.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let r = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
