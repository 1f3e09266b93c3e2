//! Helpers for request path handling and value coercion

pub mod http;
pub mod num;
