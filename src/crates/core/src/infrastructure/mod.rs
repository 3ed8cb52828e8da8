//! Infrastructure layer
//!
//! HTTP access to the classification API.

pub mod api;
