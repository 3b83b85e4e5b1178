//! Database layer: pool, the user store interface, and its backends.

mod memory;
mod pool;
mod repositories;

pub use memory::MemoryUserStore;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repositories::*;
