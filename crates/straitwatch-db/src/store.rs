//! Per-call connection to an on-disk SQLite-compatible database.
//!
//! The statement text comes straight from the caller and is executed
//! verbatim: no parameter binding, no statement whitelist, and DDL/DML is
//! allowed. This is an open injection surface kept for parity with the
//! existing dashboard; do not expose the gateway beyond trusted networks.

use libsql::{Builder, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::statement::trailing_statement;

/// Column names plus every row, collected eagerly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub data: Vec<Vec<JsonValue>>,
}

/// Result of a passthrough query. A store fault is data, not a raised error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows(QueryRows),
    Error { error: String },
}

impl QueryOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, QueryOutcome::Error { .. })
    }
}

/// Handle to the store file. Holds no connection between calls.
#[derive(Debug, Clone)]
pub struct QueryStore {
    path: PathBuf,
}

impl QueryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `sql` against a fresh connection and fold any store fault into
    /// [`QueryOutcome::Error`].
    pub async fn execute_query(&self, sql: &str) -> QueryOutcome {
        match self.run(sql).await {
            Ok(rows) => {
                debug!(columns = rows.columns.len(), rows = rows.data.len(), "Query executed");
                QueryOutcome::Rows(rows)
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                QueryOutcome::Error { error: e.to_string() }
            }
        }
    }

    /// Open, execute, collect, close. The connection is dropped on every path.
    ///
    /// Text holding more than one statement is refused before the store is
    /// opened, so nothing from it runs.
    pub async fn run(&self, sql: &str) -> Result<QueryRows> {
        if let Some(offset) = trailing_statement(sql) {
            return Err(StoreError::MultipleStatements(offset));
        }

        let db = Builder::new_local(&self.path).build().await?;
        let conn = db.connect()?;

        let mut rows = conn.query(sql, ()).await?;
        let width = rows.column_count();
        let columns = (0..width)
            .map(|i| {
                rows.column_name(i)
                    .map(str::to_string)
                    .ok_or(StoreError::Column(i))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut data = Vec::new();
        while let Some(row) = rows.next().await? {
            let mut values = Vec::with_capacity(width.max(0) as usize);
            for i in 0..width {
                values.push(to_json(row.get_value(i)?));
            }
            data.push(values);
        }

        Ok(QueryRows { columns, data })
    }
}

/// Map a store value onto JSON. Blobs are decoded as (lossy) UTF-8 text and
/// non-finite reals become `null`.
fn to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::from(i),
        Value::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s),
        Value::Blob(b) => JsonValue::String(String::from_utf8_lossy(&b).into_owned()),
    }
}
