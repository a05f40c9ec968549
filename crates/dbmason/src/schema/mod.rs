//! Schema toolkit: fluent table descriptions rendered to dialect DDL.
//!
//! [`Schema`] is the entry point. It picks the dialect builder once, from the
//! dialect tag carried by the [`Database`], and exposes create/alter/drop/
//! rename operations plus catalog introspection. Table shapes are described
//! with a closure over a [`Table`]:
//!
//! ```no_run
//! # use dbmason::database::Database;
//! # use dbmason::error::DbError;
//! # use dbmason::schema::Schema;
//! # async fn demo(db: Database) -> Result<(), DbError> {
//! let schema = Schema::new(db);
//! schema
//!     .create("users", |table| {
//!         table.big_integer("id").auto_increment();
//!         table.string("email").length(120);
//!         table.primary("pk_id", ["id"]);
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod column;
pub mod ident;
pub mod key;
pub mod table;

use tracing::info;

use crate::config::Dialect;
use crate::database::Database;
use crate::error::Result;
use crate::schema::builder::{MysqlBuilder, SchemaBuilder, SqliteBuilder};
use crate::schema::table::Table;

/// Dialect-aware schema manipulation facade.
pub struct Schema {
    db: Database,
    builder: Box<dyn SchemaBuilder>,
}

impl Schema {
    /// Create a facade for the given connection. The builder is chosen once,
    /// from the connection's dialect tag.
    pub fn new(db: Database) -> Self {
        let builder: Box<dyn SchemaBuilder> = match db.dialect() {
            Dialect::Mysql => Box::new(MysqlBuilder),
            Dialect::Sqlite => Box::new(SqliteBuilder),
        };
        Self { db, builder }
    }

    /// All user table names.
    pub async fn get_tables(&self) -> Result<Vec<String>> {
        self.builder.get_tables(&self.db).await
    }

    /// Column names of a table, in catalog order.
    pub async fn get_columns(&self, table: &str) -> Result<Vec<String>> {
        self.builder.get_columns(&self.db, table).await
    }

    /// Key names of a table.
    pub async fn get_keys(&self, table: &str) -> Result<Vec<String>> {
        self.builder.get_keys(&self.db, table).await
    }

    /// Whether a table exists.
    pub async fn has_table(&self, table: &str) -> Result<bool> {
        self.builder.has_table(&self.db, table).await
    }

    /// Whether a column exists in a table.
    pub async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.builder.has_column(&self.db, table, column).await
    }

    /// Whether a key exists in a table.
    pub async fn has_key(&self, table: &str, key: &str) -> Result<bool> {
        self.builder.has_key(&self.db, table, key).await
    }

    /// Create a table from the description built by `configure`.
    pub async fn create<F>(&self, name: &str, configure: F) -> Result<bool>
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(name);
        configure(&mut table);
        info!(table = table.get_name(), "creating table");
        self.builder.create_table(&self.db, &table).await
    }

    /// Create a table unless it already exists. Issues no DDL and returns
    /// `false` when the table is already there.
    pub async fn create_if_not_exists<F>(&self, name: &str, configure: F) -> Result<bool>
    where
        F: FnOnce(&mut Table),
    {
        if self.has_table(name).await? {
            return Ok(false);
        }
        self.create(name, configure).await
    }

    /// Drop a table.
    pub async fn drop(&self, name: &str) -> Result<bool> {
        info!(table = name, "dropping table");
        self.builder.drop_table(&self.db, name).await
    }

    /// Drop a table if it exists. Issues no DDL and returns `false` when it
    /// does not.
    pub async fn drop_if_exists(&self, name: &str) -> Result<bool> {
        if !self.has_table(name).await? {
            return Ok(false);
        }
        self.drop(name).await
    }

    /// Alter a table using the alteration entries built by `configure`.
    /// Returns `false` without issuing DDL when the table does not exist.
    pub async fn table<F>(&self, name: &str, configure: F) -> Result<bool>
    where
        F: FnOnce(&mut Table),
    {
        if !self.has_table(name).await? {
            return Ok(false);
        }
        let mut table = Table::new(name);
        configure(&mut table);
        info!(table = name, "altering table");
        self.builder.alter_table(&self.db, &table).await
    }

    /// Rename a table. Returns `false` without issuing DDL when `from` does
    /// not exist.
    pub async fn rename(&self, from: &str, to: &str) -> Result<bool> {
        if !self.has_table(from).await? {
            return Ok(false);
        }
        info!(from, to, "renaming table");
        self.builder.rename_table(&self.db, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::executor::mock::MockExecutor;
    use crate::executor::Value;

    async fn mock_db(mock: Arc<MockExecutor>, dialect: Dialect) -> Database {
        Database::connect(mock, dialect).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_if_not_exists_issues_zero_ddl_when_present() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(1));
        let db = mock_db(mock.clone(), Dialect::Mysql).await;
        let schema = Schema::new(db);
        let created = schema
            .create_if_not_exists("test", |table| {
                table.string("name");
            })
            .await
            .unwrap();
        assert!(!created);
        // Only the existence check ran.
        assert_eq!(mock.statements().len(), 1);
        assert!(mock.last_statement().starts_with("SELECT COUNT(*)"));
    }

    #[tokio::test]
    async fn test_create_if_not_exists_creates_when_missing() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(0));
        let db = mock_db(mock.clone(), Dialect::Mysql).await;
        let schema = Schema::new(db);
        let created = schema
            .create_if_not_exists("test", |table| {
                table.string("name");
            })
            .await
            .unwrap();
        assert!(created);
        assert!(mock.last_statement().starts_with("CREATE TABLE `test`"));
    }

    #[tokio::test]
    async fn test_drop_if_exists_issues_zero_ddl_when_absent() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(0));
        let db = mock_db(mock.clone(), Dialect::Mysql).await;
        let schema = Schema::new(db);
        assert!(!schema.drop_if_exists("test").await.unwrap());
        assert_eq!(mock.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_table_noops_when_missing() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(0));
        let db = mock_db(mock.clone(), Dialect::Mysql).await;
        let schema = Schema::new(db);
        let altered = schema
            .table("test", |table| {
                table.drop_column("permissions");
            })
            .await
            .unwrap();
        assert!(!altered);
        assert_eq!(mock.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_noops_when_missing() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(0));
        let db = mock_db(mock.clone(), Dialect::Mysql).await;
        let schema = Schema::new(db);
        assert!(!schema.rename("test", "foo").await.unwrap());
        assert_eq!(mock.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_builder_selected_by_tag() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(1));
        let db = mock_db(mock.clone(), Dialect::Sqlite).await;
        let schema = Schema::new(db);
        schema.has_table("test").await.unwrap();
        assert!(mock.last_statement().contains("sqlite_master"));
    }
}
