//! Dialect builders.
//!
//! A [`SchemaBuilder`] turns [`Table`] descriptions into dialect-specific DDL
//! and answers catalog questions. Builders are stateless; every operation
//! borrows the [`Database`] it should speak through. Generated SQL is a
//! compatibility surface: casing, quoting, clause ordering and whitespace are
//! all deliberate and covered by golden-string tests.

mod mysql;
mod sqlite;

pub use mysql::MysqlBuilder;
pub use sqlite::SqliteBuilder;

use async_trait::async_trait;

use crate::database::Database;
use crate::error::Result;
use crate::schema::table::Table;

/// DDL generation and catalog introspection for one dialect.
#[async_trait]
pub trait SchemaBuilder: Send + Sync {
    /// All user table names, excluding engine-internal tables.
    async fn get_tables(&self, db: &Database) -> Result<Vec<String>>;

    /// Column names of a table, in catalog ordinal order.
    async fn get_columns(&self, db: &Database, table: &str) -> Result<Vec<String>>;

    /// Key/index names of a table.
    async fn get_keys(&self, db: &Database, table: &str) -> Result<Vec<String>>;

    /// Whether a table exists. Zero count reads as `false`, never an error.
    async fn has_table(&self, db: &Database, table: &str) -> Result<bool>;

    /// Whether a column exists in a table.
    async fn has_column(&self, db: &Database, table: &str, column: &str) -> Result<bool>;

    /// Whether a key exists in a table.
    async fn has_key(&self, db: &Database, table: &str, key: &str) -> Result<bool>;

    /// Create a table. Dialects that cannot declare named indexes inline
    /// issue a statement group inside one transaction; any failure rolls the
    /// whole group back and re-raises the original error.
    async fn create_table(&self, db: &Database, table: &Table) -> Result<bool>;

    /// Apply the alterations described by the table's entries. All column
    /// clauses precede all key clauses, each set in declaration order.
    async fn alter_table(&self, db: &Database, table: &Table) -> Result<bool>;

    /// Drop a table.
    async fn drop_table(&self, db: &Database, table: &str) -> Result<bool>;

    /// Rename a table.
    async fn rename_table(&self, db: &Database, from: &str, to: &str) -> Result<bool>;
}
