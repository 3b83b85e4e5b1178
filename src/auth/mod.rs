//! Authentication: password hashing, JWT, and the register/login handlers.

mod handlers;
mod jwt;
mod password;

pub use handlers::{login, me, register, LoginRequest, RegisterRequest, RegisterResponse};
pub use jwt::{Claims, Identity, JwtSecret};
pub use password::{hash_password, verify_against_dummy, verify_password};
