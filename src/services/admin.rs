//! Admin operations over user records. Authorization happens in the request gate.

use std::sync::Arc;

use tracing::info;

use crate::db::UserStore;
use crate::error::{AppError, AppResult};
use crate::models::{normalize_role, User};

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn UserStore>,
}

impl AdminService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.find_all().await
    }

    pub async fn set_role(&self, id: i64, role: &str) -> AppResult<User> {
        let role =
            normalize_role(role).ok_or_else(|| AppError::Validation("Role is required".to_string()))?;

        let mut user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let previous = std::mem::replace(&mut user.role, role);
        self.store.save(&user).await?;

        info!(user_id = id, from = %previous, to = %user.role, "user role updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        if !self.store.delete(id).await? {
            // removed concurrently between the check and the delete
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }
}
