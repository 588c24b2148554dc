//! straitwatch-web: HTTP gateway for Straitwatch.
//! Serves:
//!   - Titanic survival and housing price inference
//!   - Raw SQL passthrough to the local store
//!   - Maritime and air traffic passthrough from upstream providers
//!   - The traffic slowdown prediction stub and a health check

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;
