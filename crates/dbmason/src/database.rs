//! Connection wrapper around an [`Executor`].
//!
//! [`Database`] pairs an executor with the dialect tag it speaks and adds the
//! small set of helpers the rest of the crate is written against: raw
//! statement execution, row selection, scalar queries and transaction
//! control. It owns a shared handle to the executor, not the executor itself.

use std::sync::Arc;

use tracing::debug;

use crate::config::Dialect;
use crate::error::{DbError, Result};
use crate::executor::{Executor, Params, Row, Value};

/// A connected database handle. Cheap to clone; clones share the executor.
#[derive(Clone)]
pub struct Database {
    executor: Arc<dyn Executor>,
    dialect: Dialect,
}

impl Database {
    /// Wrap an executor and establish its connection.
    pub async fn connect(executor: Arc<dyn Executor>, dialect: Dialect) -> Result<Self> {
        executor.connect().await?;
        debug!(adapter = executor.name(), ?dialect, "connected");
        Ok(Self { executor, dialect })
    }

    /// The dialect this connection speaks.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Adapter name of the underlying executor.
    pub fn adapter_name(&self) -> &str {
        self.executor.name()
    }

    /// Execute a non-SELECT statement.
    pub async fn execute(&self, sql: &str, params: Params) -> Result<bool> {
        debug!(adapter = self.executor.name(), sql, "execute");
        self.executor.execute(sql, params).await
    }

    /// Execute a SELECT and return every row.
    pub async fn select(&self, sql: &str, params: Params) -> Result<Vec<Row>> {
        debug!(adapter = self.executor.name(), sql, "select");
        self.executor.query(sql, params).await
    }

    /// Execute a SELECT expected to return a single one-column row and read
    /// it as an integer. Missing rows and SQL NULL read as zero; a row with
    /// more than one column is a precondition failure.
    pub async fn scalar(&self, sql: &str, params: Params) -> Result<i64> {
        let rows = self.executor.query(sql, params).await?;
        let row = match rows.first() {
            Some(row) => row,
            None => return Ok(0),
        };
        if row.len() != 1 {
            return Err(DbError::Precondition(
                "the specified query didn't return a scalar value".to_string(),
            ));
        }
        match row.first() {
            Some(value) => Ok(value.as_int().unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Begin a transaction.
    pub async fn begin(&self) -> Result<()> {
        self.executor.begin().await
    }

    /// Commit the current transaction.
    pub async fn commit(&self) -> Result<()> {
        self.executor.commit().await
    }

    /// Roll back the current transaction.
    pub async fn rollback(&self) -> Result<()> {
        self.executor.rollback().await
    }

    /// Identifier generated by the last INSERT.
    pub async fn last_insert_id(&self) -> Result<i64> {
        self.executor.last_insert_id().await
    }

    /// Whether the underlying connection is established.
    pub fn is_connected(&self) -> bool {
        self.executor.is_connected()
    }
}

/// Read a named column from a row as text, erroring when absent.
pub(crate) fn text_column(row: &Row, name: &str) -> Result<String> {
    match row.get(name) {
        Some(Value::Text(s)) => Ok(s.clone()),
        Some(Value::Int(v)) => Ok(v.to_string()),
        Some(Value::Null) | None => Err(DbError::Precondition(format!(
            "expected column '{name}' in result row"
        ))),
    }
}

/// Read a named column from a row as an integer, erroring when absent.
pub(crate) fn int_column(row: &Row, name: &str) -> Result<i64> {
    match row.get(name) {
        Some(value) => value.as_int().ok_or_else(|| {
            DbError::Precondition(format!("column '{name}' is not numeric"))
        }),
        None => Err(DbError::Precondition(format!(
            "expected column '{name}' in result row"
        ))),
    }
}
