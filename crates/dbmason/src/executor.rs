//! SQL executor contract.
//!
//! The [`Executor`] trait is the seam between this crate and whatever driver
//! actually talks to the engine. Everything above it — the [`Database`]
//! wrapper, the schema builders, the migration runner — issues statements
//! through this trait and never touches a driver directly.
//!
//! Statements are awaited to completion one at a time; nothing in this crate
//! issues concurrent statements against the same executor.
//!
//! [`Database`]: crate::database::Database

use async_trait::async_trait;

use crate::error::Result;

/// A single bound value. Integer and string values map to the corresponding
/// driver bind types; anything else should be rendered to text by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// Read the value as an integer, treating NULL as zero and parsing
    /// numeric text. Returns `None` for non-numeric text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Null => Some(0),
            Value::Int(v) => Some(*v),
            Value::Text(s) => s.parse().ok(),
        }
    }

    /// Read the value as a string slice, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Statement parameters. The container variant tells the executor whether to
/// bind positionally or by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    #[default]
    None,
    Positional(Vec<Value>),
    Named(Vec<(String, Value)>),
}

impl Params {
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Positional(v) => v.is_empty(),
            Params::Named(v) => v.is_empty(),
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for Params {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Params::Positional(iter.into_iter().map(Into::into).collect())
    }
}

/// One result row: column name/value pairs in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Value of the named column, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, value)| value)
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The first (and for scalar queries, only) value.
    pub fn first(&self) -> Option<&Value> {
        self.columns.first().map(|(_, value)| value)
    }
}

/// Driver-side statement execution.
///
/// Implementations must be `Send + Sync`; the [`Database`] wrapper shares one
/// executor behind an `Arc`.
///
/// [`Database`]: crate::database::Database
#[async_trait]
pub trait Executor: Send + Sync {
    /// Establish the connection. Fails with [`DbError::Connection`] when the
    /// engine is unreachable.
    ///
    /// [`DbError::Connection`]: crate::error::DbError::Connection
    async fn connect(&self) -> Result<bool>;

    /// Execute a non-SELECT statement, returning a success flag.
    async fn execute(&self, sql: &str, params: Params) -> Result<bool>;

    /// Execute a SELECT and return every row.
    async fn query(&self, sql: &str, params: Params) -> Result<Vec<Row>>;

    /// Begin a transaction.
    async fn begin(&self) -> Result<()>;

    /// Commit the current transaction.
    async fn commit(&self) -> Result<()>;

    /// Roll back the current transaction.
    async fn rollback(&self) -> Result<()>;

    /// Identifier generated by the last INSERT.
    async fn last_insert_id(&self) -> Result<i64>;

    /// Whether the connection is currently established.
    fn is_connected(&self) -> bool;

    /// Adapter name, used for error context and logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    //! Scripted executor for tests.
    //!
    //! Records every statement it sees (transaction boundaries included, as
    //! `BEGIN`/`COMMIT`/`ROLLBACK` markers) and replays queued result sets in
    //! FIFO order. Statements containing the configured failure marker return
    //! an execution error, which lets tests exercise rollback paths.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::error::DbError;

    #[derive(Default)]
    pub struct MockExecutor {
        statements: Mutex<Vec<String>>,
        params: Mutex<Vec<Params>>,
        results: Mutex<VecDeque<Vec<Row>>>,
        fail_marker: Mutex<Option<String>>,
        insert_id: Mutex<i64>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the result set for the next `query` call.
        pub fn push_rows(&self, rows: Vec<Row>) {
            self.results.lock().unwrap().push_back(rows);
        }

        /// Queue a single-column result, as returned by COUNT/MAX queries.
        pub fn push_scalar(&self, name: &str, value: Value) {
            self.push_rows(vec![Row::new(vec![(name.to_string(), value)])]);
        }

        /// Fail any statement whose text contains `marker`.
        pub fn fail_on(&self, marker: &str) {
            *self.fail_marker.lock().unwrap() = Some(marker.to_string());
        }

        /// Every statement seen so far, in order.
        pub fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }

        /// Parameters of the statement at `index`.
        pub fn params_at(&self, index: usize) -> Params {
            self.params.lock().unwrap()[index].clone()
        }

        /// The last recorded statement.
        pub fn last_statement(&self) -> String {
            self.statements.lock().unwrap().last().cloned().unwrap_or_default()
        }

        fn record(&self, sql: &str, params: Params) -> Result<()> {
            self.statements.lock().unwrap().push(sql.to_string());
            self.params.lock().unwrap().push(params);
            let marker = self.fail_marker.lock().unwrap();
            if let Some(marker) = marker.as_deref() {
                if sql.contains(marker) {
                    return Err(DbError::execution("mock", format!("forced failure: {marker}")));
                }
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Executor for MockExecutor {
        async fn connect(&self) -> Result<bool> {
            Ok(true)
        }

        async fn execute(&self, sql: &str, params: Params) -> Result<bool> {
            self.record(sql, params)?;
            Ok(true)
        }

        async fn query(&self, sql: &str, params: Params) -> Result<Vec<Row>> {
            self.record(sql, params)?;
            Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn begin(&self) -> Result<()> {
            self.record("BEGIN", Params::None)
        }

        async fn commit(&self) -> Result<()> {
            self.record("COMMIT", Params::None)
        }

        async fn rollback(&self) -> Result<()> {
            self.record("ROLLBACK", Params::None)
        }

        async fn last_insert_id(&self) -> Result<i64> {
            let mut id = self.insert_id.lock().unwrap();
            *id += 1;
            Ok(*id)
        }

        fn is_connected(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "mock"
        }
    }
}
