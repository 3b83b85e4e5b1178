//! Admin user management: list, change role, delete.

mod handlers;

pub use handlers::{delete_user, list_users, set_role, SetRoleRequest, SetRoleResponse};
