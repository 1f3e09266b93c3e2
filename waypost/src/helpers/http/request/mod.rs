//! Helpers for processing the request path

pub mod path;
