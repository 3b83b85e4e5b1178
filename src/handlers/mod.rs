//! HTTP state and shared handlers.

pub mod http;

pub use http::*;
