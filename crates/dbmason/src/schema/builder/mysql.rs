//! MySQL dialect builder.
//!
//! Catalog questions go through INFORMATION_SCHEMA; alterations pack into a
//! single comma-joined ALTER TABLE statement. Renames introspect the old
//! column so the redefinition keeps its physical type, and its nullability
//! and default wherever the caller gave no explicit override.

use async_trait::async_trait;
use tracing::debug;

use crate::database::{text_column, Database};
use crate::error::{DbError, Result};
use crate::executor::{Params, Value};
use crate::schema::column::{Column, ColumnType, DefaultValue, Operation, Precision};
use crate::schema::ident;
use crate::schema::key::{Key, KeyOperation, KeyType};
use crate::schema::table::Table;

use super::SchemaBuilder;

/// Builder for the MySQL dialect.
pub struct MysqlBuilder;

#[async_trait]
impl SchemaBuilder for MysqlBuilder {
    async fn get_tables(&self, db: &Database) -> Result<Vec<String>> {
        let sql = "SELECT TABLE_NAME AS name FROM INFORMATION_SCHEMA.TABLES \
                   WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_SCHEMA = DATABASE()";
        let rows = db.select(sql, Params::None).await?;
        rows.iter().map(|row| text_column(row, "name")).collect()
    }

    async fn get_columns(&self, db: &Database, table: &str) -> Result<Vec<String>> {
        let sql = "SELECT COLUMN_NAME AS name FROM INFORMATION_SCHEMA.COLUMNS \
                   WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE() \
                   ORDER BY ORDINAL_POSITION";
        let rows = db.select(sql, [table].into_iter().collect()).await?;
        rows.iter().map(|row| text_column(row, "name")).collect()
    }

    async fn get_keys(&self, db: &Database, table: &str) -> Result<Vec<String>> {
        let sql = "SELECT DISTINCT INDEX_NAME AS name FROM INFORMATION_SCHEMA.STATISTICS \
                   WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE()";
        let rows = db.select(sql, [table].into_iter().collect()).await?;
        rows.iter().map(|row| text_column(row, "name")).collect()
    }

    async fn has_table(&self, db: &Database, table: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS total FROM INFORMATION_SCHEMA.TABLES \
                   WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE()";
        let total = db.scalar(sql, [table].into_iter().collect()).await?;
        Ok(total > 0)
    }

    async fn has_column(&self, db: &Database, table: &str, column: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS total FROM INFORMATION_SCHEMA.COLUMNS \
                   WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE() AND COLUMN_NAME = ?";
        let total = db.scalar(sql, [table, column].into_iter().collect()).await?;
        Ok(total > 0)
    }

    async fn has_key(&self, db: &Database, table: &str, key: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS total FROM INFORMATION_SCHEMA.STATISTICS \
                   WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE() AND INDEX_NAME = ?";
        let total = db.scalar(sql, [table, key].into_iter().collect()).await?;
        Ok(total > 0)
    }

    async fn create_table(&self, db: &Database, table: &Table) -> Result<bool> {
        let mut defs = Vec::new();
        for column in table.get_columns() {
            defs.push(format!("    {}", pack_column(column)?));
        }
        for key in table.get_keys() {
            defs.push(format!("    {}", pack_key(key)?));
        }
        let sql = format!(
            "CREATE TABLE {} (\n{}\n);",
            ident::quoted(table.get_name())?,
            defs.join(",\n")
        );
        debug!(table = table.get_name(), "create table");
        db.execute(&sql, Params::None).await
    }

    async fn alter_table(&self, db: &Database, table: &Table) -> Result<bool> {
        let name = table.get_name();
        let mut column_defs = Vec::new();
        for column in table.get_columns() {
            let clause = match column.get_operation() {
                Operation::Add => {
                    let after = match column.get_after() {
                        Some(after) => format!(" AFTER {}", ident::quoted(after)?),
                        None => String::new(),
                    };
                    format!("    ADD {}{}", pack_column(column)?, after)
                }
                Operation::Drop => {
                    format!("    DROP COLUMN {}", ident::quoted(column.get_name())?)
                }
                Operation::Modify => format!(
                    "    CHANGE COLUMN {} {}",
                    ident::quoted(column.get_name())?,
                    pack_column(column)?
                ),
                Operation::Rename => {
                    let old_name = column.get_old_name();
                    let attributes = column_attributes(db, name, old_name).await?;
                    let mut merged = column.clone();
                    if !merged.has_explicit_nullable() {
                        merged.nullable(attributes.nullable);
                    }
                    if !merged.has_explicit_default() {
                        if let Some(default) = &attributes.default {
                            merged.default_value(default);
                        }
                    }
                    // The placeholder type set by renameColumn-style sugar is
                    // replaced by the introspected physical type; an explicit
                    // type on the entry wins.
                    if matches!(merged.get_type(), ColumnType::Custom(raw) if raw.is_empty()) {
                        merged.column_type(ColumnType::Custom(attributes.raw_type.clone()));
                    }
                    format!(
                        "    CHANGE COLUMN {} {}",
                        ident::quoted(old_name)?,
                        pack_column(&merged)?
                    )
                }
            };
            column_defs.push(clause);
        }
        let mut key_defs = Vec::new();
        for key in table.get_keys() {
            let clause = match key.get_operation() {
                KeyOperation::Add => format!("    ADD {}", pack_key(key)?),
                KeyOperation::Drop => {
                    format!("    DROP INDEX {}", ident::quoted(key.get_name())?)
                }
            };
            key_defs.push(clause);
        }
        let mut defs = column_defs;
        defs.extend(key_defs);
        let sql = format!("ALTER TABLE {}\n{};", ident::quoted(name)?, defs.join(",\n"));
        debug!(table = name, "alter table");
        db.execute(&sql, Params::None).await
    }

    async fn drop_table(&self, db: &Database, table: &str) -> Result<bool> {
        let sql = format!("DROP TABLE {};", ident::quoted(table)?);
        db.execute(&sql, Params::None).await
    }

    async fn rename_table(&self, db: &Database, from: &str, to: &str) -> Result<bool> {
        let sql = format!(
            "RENAME TABLE {} TO {};",
            ident::quoted(from)?,
            ident::quoted(to)?
        );
        db.execute(&sql, Params::None).await
    }
}

/// Introspected attributes of an existing column, for rename clauses.
struct ColumnAttributes {
    raw_type: String,
    nullable: bool,
    default: Option<String>,
}

async fn column_attributes(db: &Database, table: &str, column: &str) -> Result<ColumnAttributes> {
    let sql = "SELECT COLUMN_TYPE, IS_NULLABLE, COLUMN_DEFAULT FROM INFORMATION_SCHEMA.COLUMNS \
               WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE() AND COLUMN_NAME = ?";
    let rows = db.select(sql, [table, column].into_iter().collect()).await?;
    let row = rows.first().ok_or_else(|| {
        DbError::Precondition(format!("column '{column}' does not exist in table '{table}'"))
    })?;
    Ok(ColumnAttributes {
        raw_type: text_column(row, "COLUMN_TYPE")?,
        nullable: row.get("IS_NULLABLE").and_then(Value::as_text) != Some("NO"),
        default: row
            .get("COLUMN_DEFAULT")
            .and_then(Value::as_text)
            .map(str::to_string),
    })
}

fn type_keyword(column_type: &ColumnType) -> String {
    let keyword = match column_type {
        ColumnType::BigInt => "BIGINT",
        ColumnType::Binary => "BLOB",
        ColumnType::Boolean => "TINYINT",
        ColumnType::Char => "CHAR",
        ColumnType::Date => "DATE",
        ColumnType::DateTime => "DATETIME",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Double => "DOUBLE",
        ColumnType::Enum => "ENUM",
        ColumnType::Float => "FLOAT",
        ColumnType::Int => "INT",
        ColumnType::Json => "JSON",
        ColumnType::LongText => "LONGTEXT",
        ColumnType::MediumInt => "MEDIUMINT",
        ColumnType::MediumText => "MEDIUMTEXT",
        ColumnType::SmallInt => "SMALLINT",
        ColumnType::String => "VARCHAR",
        ColumnType::Text => "TEXT",
        ColumnType::Time => "TIME",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::TinyInt => "TINYINT",
        // Unknown type, pass it through verbatim.
        ColumnType::Custom(raw) => return raw.clone(),
    };
    keyword.to_string()
}

fn pack_column(column: &Column) -> Result<String> {
    let mut def = ident::quoted(column.get_name())?;
    def.push(' ');
    def.push_str(&type_keyword(column.get_type()));
    if let Some(length) = column.get_length() {
        def.push_str(&format!("({length})"));
    } else if let Some(precision) = column.get_precision() {
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
    if column.is_unsigned() {
        def.push_str(" UNSIGNED");
    }
    def.push_str(if column.is_nullable() { " NULL" } else { " NOT NULL" });
    if column.is_auto_increment() {
        def.push_str(" AUTO_INCREMENT");
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

fn pack_key(key: &Key) -> Result<String> {
    let kind = match key.get_type() {
        KeyType::Index => "INDEX".to_string(),
        KeyType::Primary => "PRIMARY KEY".to_string(),
        KeyType::Unique => "UNIQUE INDEX".to_string(),
        KeyType::Foreign => "FOREIGN KEY".to_string(),
        // Unknown type, pass it through verbatim.
        KeyType::Custom(raw) => raw.clone(),
    };
    Ok(format!(
        "{} {} ({})",
        kind,
        ident::quoted(key.get_name())?,
        ident::quote_list(key.get_columns())?
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Dialect;
    use crate::executor::mock::MockExecutor;
    use crate::executor::Row;

    async fn mock_db(mock: Arc<MockExecutor>) -> Database {
        Database::connect(mock, Dialect::Mysql).await.unwrap()
    }

    // ===== rendering =====

    #[test]
    fn test_pack_column_literal_default() {
        let mut column = Column::new("points", ColumnType::Int);
        column.nullable(true).default_value(0);
        assert_eq!(pack_column(&column).unwrap(), "`points` INT NULL DEFAULT '0'");
    }

    #[test]
    fn test_pack_column_raw_default_unquoted() {
        let mut column = Column::new("created", ColumnType::DateTime);
        column.nullable(true).default_raw("NOW()");
        assert_eq!(
            pack_column(&column).unwrap(),
            "`created` DATETIME NULL DEFAULT NOW()"
        );
    }

    #[test]
    fn test_pack_column_enum_options() {
        let mut column = Column::new("status", ColumnType::Enum);
        column.options(["Active", "Inactive"]);
        assert_eq!(
            pack_column(&column).unwrap(),
            "`status` ENUM('Active', 'Inactive') NOT NULL"
        );
    }

    #[test]
    fn test_pack_key_unique() {
        let mut key = Key::new("uk_email", KeyType::Unique);
        key.columns(["email"]);
        assert_eq!(pack_key(&key).unwrap(), "UNIQUE INDEX `uk_email` (`email`)");
    }

    // ===== create =====

    #[tokio::test]
    async fn test_create_table_golden() {
        let mock = Arc::new(MockExecutor::new());
        let db = mock_db(mock.clone()).await;
        let mut table = Table::new("t");
        table.big_integer("id").auto_increment();
        table.string("name").length(120);
        table.primary("pk_id", ["id"]);
        MysqlBuilder.create_table(&db, &table).await.unwrap();
        assert_eq!(
            mock.last_statement(),
            "CREATE TABLE `t` (\n\
             \x20   `id` BIGINT NOT NULL AUTO_INCREMENT,\n\
             \x20   `name` VARCHAR(120) NOT NULL,\n\
             \x20   PRIMARY KEY `pk_id` (`id`)\n\
             );"
        );
    }

    #[tokio::test]
    async fn test_create_table_unsigned_and_raw_default() {
        let mock = Arc::new(MockExecutor::new());
        let db = mock_db(mock.clone()).await;
        let mut table = Table::new("test");
        table.big_integer("id").unsigned().auto_increment();
        table.string("name").length(120);
        table.double("karma").precision_scale(4, 2);
        table.datetime("created").nullable(true).default_raw("NOW()");
        table.primary("pk_id", ["id"]);
        table.foreign("fk_email", ["email"]);
        MysqlBuilder.create_table(&db, &table).await.unwrap();
        assert_eq!(
            mock.last_statement(),
            "CREATE TABLE `test` (\n\
             \x20   `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,\n\
             \x20   `name` VARCHAR(120) NOT NULL,\n\
             \x20   `karma` DOUBLE(4, 2) NOT NULL,\n\
             \x20   `created` DATETIME NULL DEFAULT NOW(),\n\
             \x20   PRIMARY KEY `pk_id` (`id`),\n\
             \x20   FOREIGN KEY `fk_email` (`email`)\n\
             );"
        );
    }

    #[tokio::test]
    async fn test_create_table_all_types_golden() {
        let mock = Arc::new(MockExecutor::new());
        let db = mock_db(mock.clone()).await;
        let mut table = Table::new("test");
        table.big_integer("col_big_integer");
        table.binary("col_binary");
        table.boolean("col_boolean");
        table.char("col_char");
        table.date("col_date");
        table.datetime("col_datetime");
        table.decimal("col_decimal");
        table.double("col_double");
        table.enumeration("col_enum");
        table.float("col_float");
        table.integer("col_integer");
        table.json("col_json");
        table.long_text("col_long_text");
        table.medium_integer("col_medium_integer");
        table.medium_text("col_medium_text");
        table.small_integer("col_small_integer");
        table.tiny_integer("col_tiny_integer");
        table.string("col_string");
        table.text("col_text");
        table.time("col_time");
        table.timestamp("col_timestamp");
        MysqlBuilder.create_table(&db, &table).await.unwrap();
        assert_eq!(
            mock.last_statement(),
            "CREATE TABLE `test` (\n\
             \x20   `col_big_integer` BIGINT NOT NULL,\n\
             \x20   `col_binary` BLOB NOT NULL,\n\
             \x20   `col_boolean` TINYINT NOT NULL,\n\
             \x20   `col_char` CHAR(100) NOT NULL,\n\
             \x20   `col_date` DATE NOT NULL,\n\
             \x20   `col_datetime` DATETIME NOT NULL,\n\
             \x20   `col_decimal` DECIMAL(5, 2) NOT NULL,\n\
             \x20   `col_double` DOUBLE(15) NOT NULL,\n\
             \x20   `col_enum` ENUM NOT NULL,\n\
             \x20   `col_float` FLOAT NOT NULL,\n\
             \x20   `col_integer` INT NOT NULL,\n\
             \x20   `col_json` JSON NOT NULL,\n\
             \x20   `col_long_text` LONGTEXT NOT NULL,\n\
             \x20   `col_medium_integer` MEDIUMINT NOT NULL,\n\
             \x20   `col_medium_text` MEDIUMTEXT NOT NULL,\n\
             \x20   `col_small_integer` SMALLINT NOT NULL,\n\
             \x20   `col_tiny_integer` TINYINT NOT NULL,\n\
             \x20   `col_string` VARCHAR(100) NOT NULL,\n\
             \x20   `col_text` TEXT NOT NULL,\n\
             \x20   `col_time` TIME NOT NULL,\n\
             \x20   `col_timestamp` TIMESTAMP NOT NULL\n\
             );"
        );
    }

    // ===== alter =====

    #[tokio::test]
    async fn test_alter_table_golden() {
        let mock = Arc::new(MockExecutor::new());
        // Introspection result for the rename of `login`.
        mock.push_rows(vec![Row::new(vec![
            ("COLUMN_TYPE".to_string(), Value::Text("VARCHAR".to_string())),
            ("IS_NULLABLE".to_string(), Value::Text("NO".to_string())),
            ("COLUMN_DEFAULT".to_string(), Value::Null),
        ])]);
        let db = mock_db(mock.clone()).await;
        let mut table = Table::new("test");
        table.index("pk_id_email", ["id", "email"]);
        table.drop_index("pk_id");
        table.rename_column("login", "email");
        table.datetime("modified").after("created").nullable(true);
        table.string("type").modify().default_value("Subscriber").nullable(true);
        table.drop_column("permissions");
        MysqlBuilder.alter_table(&db, &table).await.unwrap();
        assert_eq!(
            mock.last_statement(),
            "ALTER TABLE `test`\n\
             \x20   CHANGE COLUMN `login` `email` VARCHAR NOT NULL,\n\
             \x20   ADD `modified` DATETIME NULL AFTER `created`,\n\
             \x20   CHANGE COLUMN `type` `type` VARCHAR(100) NULL DEFAULT 'Subscriber',\n\
             \x20   DROP COLUMN `permissions`,\n\
             \x20   ADD INDEX `pk_id_email` (`id`, `email`),\n\
             \x20   DROP INDEX `pk_id`;"
        );
    }

    #[tokio::test]
    async fn test_rename_preserves_introspected_default() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_rows(vec![Row::new(vec![
            ("COLUMN_TYPE".to_string(), Value::Text("INT".to_string())),
            ("IS_NULLABLE".to_string(), Value::Text("YES".to_string())),
            ("COLUMN_DEFAULT".to_string(), Value::Text("0".to_string())),
        ])]);
        let db = mock_db(mock.clone()).await;
        let mut table = Table::new("test");
        table.rename_column("points", "score");
        MysqlBuilder.alter_table(&db, &table).await.unwrap();
        assert_eq!(
            mock.last_statement(),
            "ALTER TABLE `test`\n\
             \x20   CHANGE COLUMN `points` `score` INT NULL DEFAULT '0';"
        );
    }

    #[tokio::test]
    async fn test_drop_keys_always_render_drop_index() {
        let mock = Arc::new(MockExecutor::new());
        let db = mock_db(mock.clone()).await;
        let mut table = Table::new("test");
        table.drop_key("some_key");
        table.drop_unique("uk_some_key");
        table.drop_primary("pk_some_key");
        table.drop_foreign("fk_some_key");
        table.drop_index("idx_some_key");
        MysqlBuilder.alter_table(&db, &table).await.unwrap();
        assert_eq!(
            mock.last_statement(),
            "ALTER TABLE `test`\n\
             \x20   DROP INDEX `some_key`,\n\
             \x20   DROP INDEX `uk_some_key`,\n\
             \x20   DROP INDEX `pk_some_key`,\n\
             \x20   DROP INDEX `fk_some_key`,\n\
             \x20   DROP INDEX `idx_some_key`;"
        );
    }

    // ===== single statements =====

    #[tokio::test]
    async fn test_drop_and_rename_table() {
        let mock = Arc::new(MockExecutor::new());
        let db = mock_db(mock.clone()).await;
        MysqlBuilder.drop_table(&db, "test").await.unwrap();
        assert_eq!(mock.last_statement(), "DROP TABLE `test`;");
        MysqlBuilder.rename_table(&db, "test", "foo").await.unwrap();
        assert_eq!(mock.last_statement(), "RENAME TABLE `test` TO `foo`;");
    }

    // ===== introspection =====

    #[tokio::test]
    async fn test_has_table_zero_count_is_false() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_scalar("total", Value::Int(0));
        let db = mock_db(mock.clone()).await;
        assert!(!MysqlBuilder.has_table(&db, "missing").await.unwrap());
        let params = mock.params_at(0);
        assert_eq!(params, ["missing"].into_iter().collect::<Params>());
    }

    #[tokio::test]
    async fn test_get_columns_reads_names() {
        let mock = Arc::new(MockExecutor::new());
        mock.push_rows(vec![
            Row::new(vec![("name".to_string(), Value::Text("id".to_string()))]),
            Row::new(vec![("name".to_string(), Value::Text("email".to_string()))]),
        ]);
        let db = mock_db(mock.clone()).await;
        let columns = MysqlBuilder.get_columns(&db, "test").await.unwrap();
        assert_eq!(columns, ["id", "email"]);
    }
}
