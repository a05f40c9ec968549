//! SQLite dialect builder.
//!
//! SQLite cannot declare named secondary indexes inline, cannot combine
//! heterogeneous alterations into one ALTER TABLE, and cannot modify columns
//! or drop primary keys at all. Creates and alters therefore run as statement
//! groups inside one transaction, and the unsupported operations fail during
//! rendering, before any SQL reaches the executor.

use async_trait::async_trait;
use tracing::debug;

use crate::database::{text_column, Database};
use crate::error::{DbError, Result};
use crate::executor::Params;
use crate::schema::column::{Column, ColumnType, DefaultValue, Operation, Precision};
use crate::schema::ident;
use crate::schema::key::{Key, KeyOperation, KeyType};
use crate::schema::table::Table;

use super::SchemaBuilder;

/// Builder for the SQLite dialect.
pub struct SqliteBuilder;

#[async_trait]
impl SchemaBuilder for SqliteBuilder {
    async fn get_tables(&self, db: &Database) -> Result<Vec<String>> {
        let sql = "SELECT name FROM sqlite_master \
                   WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";
        let rows = db.select(sql, Params::None).await?;
        rows.iter().map(|row| text_column(row, "name")).collect()
    }

    async fn get_columns(&self, db: &Database, table: &str) -> Result<Vec<String>> {
        let sql = "SELECT name FROM pragma_table_info(?) ORDER BY cid";
        let rows = db.select(sql, [table].into_iter().collect()).await?;
        rows.iter().map(|row| text_column(row, "name")).collect()
    }

    async fn get_keys(&self, db: &Database, table: &str) -> Result<Vec<String>> {
        let sql = "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?";
        let rows = db.select(sql, [table].into_iter().collect()).await?;
        rows.iter().map(|row| text_column(row, "name")).collect()
    }

    async fn has_table(&self, db: &Database, table: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS total FROM sqlite_master \
                   WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name = ?";
        let total = db.scalar(sql, [table].into_iter().collect()).await?;
        Ok(total > 0)
    }

    async fn has_column(&self, db: &Database, table: &str, column: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS total FROM pragma_table_info(?) WHERE name = ?";
        let total = db.scalar(sql, [table, column].into_iter().collect()).await?;
        Ok(total > 0)
    }

    async fn has_key(&self, db: &Database, table: &str, key: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS total FROM sqlite_master \
                   WHERE type = 'index' AND tbl_name = ? AND name = ?";
        let total = db.scalar(sql, [table, key].into_iter().collect()).await?;
        Ok(total > 0)
    }

    async fn create_table(&self, db: &Database, table: &Table) -> Result<bool> {
        let name = table.get_name();
        let mut column_defs = Vec::new();
        for column in table.get_columns() {
            column_defs.push(format!("    {}", pack_column(column)?));
        }
        let mut statements = vec![format!(
            "CREATE TABLE {} (\n{}\n);",
            ident::quoted(name)?,
            column_defs.join(",\n")
        )];
        for key in table.get_keys() {
            // Primary keys are carried by the autoincrement column.
            if *key.get_type() == KeyType::Primary {
                continue;
            }
            statements.push(format!("CREATE {}", pack_key(key, name)?));
        }
        debug!(table = name, statements = statements.len(), "create table group");
        run_group(db, &statements).await
    }

    async fn alter_table(&self, db: &Database, table: &Table) -> Result<bool> {
        let name = table.get_name();
        let quoted_table = ident::quoted(name)?;
        let mut statements = Vec::new();
        for column in table.get_columns() {
            let statement = match column.get_operation() {
                Operation::Add => format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    quoted_table,
                    pack_column(column)?
                ),
                Operation::Drop => format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    quoted_table,
                    ident::quoted(column.get_name())?
                ),
                Operation::Modify => {
                    return Err(DbError::Unsupported(
                        "column modification is not supported on sqlite".to_string(),
                    ));
                }
                Operation::Rename => format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {}",
                    quoted_table,
                    ident::quoted(column.get_old_name())?,
                    ident::quoted(column.get_name())?
                ),
            };
            statements.push(statement);
        }
        for key in table.get_keys() {
            let statement = match key.get_operation() {
                KeyOperation::Add => format!("CREATE {}", pack_key(key, name)?),
                KeyOperation::Drop => {
                    if *key.get_type() == KeyType::Primary {
                        return Err(DbError::Unsupported(
                            "primary key deletion is not supported on sqlite".to_string(),
                        ));
                    }
                    format!("DROP INDEX {}", ident::quoted(key.get_name())?)
                }
            };
            statements.push(statement);
        }
        debug!(table = name, statements = statements.len(), "alter table group");
        run_group(db, &statements).await
    }

    async fn drop_table(&self, db: &Database, table: &str) -> Result<bool> {
        let sql = format!("DROP TABLE {};", ident::quoted(table)?);
        db.execute(&sql, Params::None).await
    }

    async fn rename_table(&self, db: &Database, from: &str, to: &str) -> Result<bool> {
        let sql = format!(
            "ALTER TABLE {} RENAME TO {};",
            ident::quoted(from)?,
            ident::quoted(to)?
        );
        db.execute(&sql, Params::None).await
    }
}

/// Execute a statement group inside one transaction. Any failure rolls the
/// whole group back and re-raises the original error; the transaction never
/// outlives the call.
async fn run_group(db: &Database, statements: &[String]) -> Result<bool> {
    db.begin().await?;
    let mut ret = true;
    for sql in statements {
        match db.execute(sql, Params::None).await {
            Ok(ok) => {
                ret = ok;
                if !ok {
                    break;
                }
            }
            Err(err) => {
                db.rollback().await.ok();
                return Err(err);
            }
        }
    }
    db.commit().await?;
    Ok(ret)
}

fn type_keyword(column_type: &ColumnType) -> String {
    let keyword = match column_type {
        ColumnType::BigInt
        | ColumnType::Boolean
        | ColumnType::Int
        | ColumnType::MediumInt
        | ColumnType::SmallInt
        | ColumnType::Timestamp
        | ColumnType::TinyInt => "INTEGER",
        ColumnType::Binary => "BLOB",
        ColumnType::Char
        | ColumnType::Date
        | ColumnType::DateTime
        | ColumnType::Enum
        | ColumnType::Json
        | ColumnType::LongText
        | ColumnType::MediumText
        | ColumnType::String
        | ColumnType::Text
        | ColumnType::Time => "TEXT",
        ColumnType::Decimal | ColumnType::Double | ColumnType::Float => "REAL",
        // Unknown type, pass it through verbatim.
        ColumnType::Custom(raw) => return raw.clone(),
    };
    keyword.to_string()
}

fn pack_column(column: &Column) -> Result<String> {
    let mut def = ident::quoted(column.get_name())?;
    def.push(' ');
    def.push_str(&type_keyword(column.get_type()));
    // Lengths are meaningless to SQLite and dropped; precision is kept.
    if let Some(precision) = column.get_precision() {
        match precision {
            Precision::Scalar(digits) => def.push_str(&format!("({digits})")),
            Precision::Pair(digits, scale) => def.push_str(&format!("({digits}, {scale})")),
        }
    } else if !column.get_options().is_empty() {
        let options: Vec<String> = column
            .get_options()
            .iter()
            .map(|option| format!("'{}'", option.replace('\'', "''")))
            .collect();
        def.push_str(&format!("({})", options.join(", ")));
    }
    def.push_str(if column.is_nullable() { " NULL" } else { " NOT NULL" });
    if column.is_auto_increment() {
        def.push_str(" PRIMARY KEY AUTOINCREMENT");
    }
    if let Some(default) = column.get_default() {
        match default {
            DefaultValue::Literal(value) => {
                def.push_str(&format!(" DEFAULT '{}'", value.replace('\'', "''")));
            }
            DefaultValue::Raw(expression) => {
                def.push_str(&format!(" DEFAULT {expression}"));
            }
        }
    }
    Ok(def)
}

fn pack_key(key: &Key, table: &str) -> Result<String> {
    let kind = match key.get_type() {
        KeyType::Index => "INDEX".to_string(),
        KeyType::Primary => {
            return Err(DbError::Unsupported(
                "primary key creation is not supported on sqlite".to_string(),
            ));
        }
        KeyType::Unique => "UNIQUE INDEX".to_string(),
        KeyType::Foreign => "FOREIGN KEY".to_string(),
        // Unknown type, pass it through verbatim.
        KeyType::Custom(raw) => raw.clone(),
    };
    Ok(format!(
        "{} {} ON {}({})",
        kind,
        ident::quoted(key.get_name())?,
        ident::quoted(table)?,
        ident::quote_list(key.get_columns())?
    ))
}
