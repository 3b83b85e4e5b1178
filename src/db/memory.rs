//! In-memory user store for development runs and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::repositories::{UserStore, DUPLICATE_EMAIL};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

/// Same contract as the PostgreSQL store: unique email, ids assigned on insert.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            display_name: user.display_name,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;
        stored.role = user.role.clone();
        stored.display_name = user.display_name.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.read().await.users.contains_key(&id))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }
}
