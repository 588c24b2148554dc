//! straitwatch-db: raw SQL passthrough to the local relational store.

pub mod error;
pub mod statement;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{QueryOutcome, QueryRows, QueryStore};
