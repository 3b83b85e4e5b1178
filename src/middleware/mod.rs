//! HTTP middleware: the request gate that authenticates and authorizes every route.

pub mod auth;

pub use auth::{request_gate, required_access, Access, CurrentIdentity};
