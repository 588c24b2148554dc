//! Store error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sql(#[from] libsql::Error),

    #[error("Invalid column index: {0}")]
    Column(i32),

    #[error("You can only execute one statement at a time (second statement at byte {0})")]
    MultipleStatements(usize),
}
