//! HTTP handlers for all gateway routes.

pub mod predict;
pub mod query;
pub mod system;
pub mod traffic;
