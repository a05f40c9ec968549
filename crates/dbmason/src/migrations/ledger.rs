//! Migration ledger: the persisted table of applied migrations.
//!
//! One row per applied migration, carrying the name, the registered type
//! name, the batch number and timestamps. The physical table is created
//! through the schema facade, so the dialect's type map applies.

use tracing::debug;

use crate::config::Dialect;
use crate::database::{int_column, text_column, Database};
use crate::error::Result;
use crate::executor::{Params, Row, Value};
use crate::schema::Schema;

/// Row order for ledger reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// One applied-migration row.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    pub id: i64,
    pub name: String,
    pub class: String,
    pub batch: i64,
    pub created: String,
    pub modified: String,
}

impl MigrationRecord {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: int_column(row, "id")?,
            name: text_column(row, "name")?,
            class: text_column(row, "class")?,
            batch: int_column(row, "batch")?,
            created: row
                .get("created")
                .and_then(Value::as_text)
                .unwrap_or_default()
                .to_string(),
            modified: row
                .get("modified")
                .and_then(Value::as_text)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Ledger table access for one connection.
pub struct Ledger {
    db: Database,
    table: String,
}

impl Ledger {
    pub fn new(db: Database, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Create the ledger table when missing. Returns whether the table exists
    /// after the call made it; `false` means it was already there.
    pub async fn setup(&self) -> Result<bool> {
        let schema = Schema::new(self.db.clone());
        if schema.has_table(&self.table).await? {
            return Ok(false);
        }
        debug!(table = %self.table, "creating migration ledger");
        match self.db.dialect() {
            Dialect::Mysql => {
                schema
                    .create(&self.table, |table| {
                        table.big_integer("id").auto_increment();
                        table.string("name").length(180);
                        table.string("class").length(180);
                        table.integer("batch");
                        table.datetime("created");
                        table.datetime("modified");
                        table.index("key_name", ["name"]);
                        table.index("key_class", ["class"]);
                        table.primary("pk_id", ["id"]);
                    })
                    .await?;
            }
            Dialect::Sqlite => {
                schema
                    .create(&self.table, |table| {
                        table.big_integer("id").auto_increment();
                        table.string("name");
                        table.string("class");
                        table.integer("batch");
                        table.datetime("created");
                        table.datetime("modified");
                        table.index("key_migration_name", ["name"]);
                        table.index("key_migration_class", ["class"]);
                    })
                    .await?;
            }
        }
        schema.has_table(&self.table).await
    }

    /// Applied migrations ordered by id, optionally limited to the most
    /// recent `limit` rows (descending order required for that to be useful).
    pub async fn applied(
        &self,
        order: SortOrder,
        limit: Option<i64>,
    ) -> Result<Vec<MigrationRecord>> {
        let mut sql = format!(
            "SELECT * FROM `{}` ORDER BY `id` {}",
            self.table,
            order.keyword()
        );
        if let Some(limit) = limit {
            if limit > 0 {
                sql.push_str(&format!(" LIMIT {limit}"));
            }
        }
        let rows = self.db.select(&sql, Params::None).await?;
        rows.iter().map(MigrationRecord::from_row).collect()
    }

    /// Applied migrations of one batch, ordered by id.
    pub async fn applied_by_batch(
        &self,
        batch: i64,
        order: SortOrder,
    ) -> Result<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT * FROM `{}` WHERE batch = ? ORDER BY `id` {}",
            self.table,
            order.keyword()
        );
        let rows = self
            .db
            .select(&sql, Params::Positional(vec![Value::Int(batch)]))
            .await?;
        rows.iter().map(MigrationRecord::from_row).collect()
    }

    /// Highest batch number in the ledger, zero when empty.
    pub async fn latest_batch(&self) -> Result<i64> {
        let sql = format!("SELECT max(`batch`) AS max FROM `{}`", self.table);
        self.db.scalar(&sql, Params::None).await
    }

    /// Number of rows in the ledger.
    pub async fn total(&self) -> Result<i64> {
        let sql = format!("SELECT count(`batch`) AS count FROM `{}`", self.table);
        self.db.scalar(&sql, Params::None).await
    }

    /// Record an applied migration and return its surrogate id.
    pub async fn store(&self, name: &str, class: &str, batch: i64) -> Result<i64> {
        let sql = match self.db.dialect() {
            Dialect::Mysql => format!(
                "INSERT INTO `{}` (`id`, `name`, `class`, `batch`, `created`, `modified`) \
                 VALUES (0, ?, ?, ?, NOW(), NOW())",
                self.table
            ),
            Dialect::Sqlite => format!(
                "INSERT INTO `{}` (`id`, `name`, `class`, `batch`, `created`, `modified`) \
                 VALUES (NULL, ?, ?, ?, DATE('now'), DATE('now'))",
                self.table
            ),
        };
        let params = Params::Positional(vec![
            Value::Text(name.to_string()),
            Value::Text(class.to_string()),
            Value::Int(batch),
        ]);
        self.db.execute(&sql, params).await?;
        self.db.last_insert_id().await
    }

    /// Remove one applied-migration row.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM `{}` WHERE id = ?", self.table);
        self.db
            .execute(&sql, Params::Positional(vec![Value::Int(id)]))
            .await?;
        Ok(())
    }

    /// Empty the ledger, resetting surrogate keys where the dialect allows.
    pub async fn clear(&self) -> Result<()> {
        let sql = match self.db.dialect() {
            Dialect::Mysql => format!("TRUNCATE `{}`", self.table),
            Dialect::Sqlite => format!("DELETE FROM `{}`", self.table),
        };
        self.db.execute(&sql, Params::None).await?;
        Ok(())
    }
}
