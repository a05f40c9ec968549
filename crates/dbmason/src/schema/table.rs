//! Table model.
//!
//! A [`Table`] is an ordered collection of [`Column`] and [`Key`] entries,
//! built through a fluent interface and consumed exactly once by a dialect
//! builder. The same structure describes both a new table and a set of
//! alterations; each entry's operation flag tells the builder which clause
//! to emit, and the facade method supplies the create-versus-alter context.

use crate::schema::column::{Column, ColumnType};
use crate::schema::key::{Key, KeyType};

/// A named, ordered collection of column and key entries.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    keys: Vec<Key>,
}

impl Table {
    /// Create an empty table description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Set the table name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Columns in insertion order.
    pub fn get_columns(&self) -> &[Column] {
        &self.columns
    }

    /// Keys in insertion order.
    pub fn get_keys(&self) -> &[Key] {
        &self.keys
    }

    /// Append a column of the given type and return it for configuration.
    pub fn column(&mut self, name: impl Into<String>, column_type: ColumnType) -> &mut Column {
        self.columns.push(Column::new(name, column_type));
        self.columns.last_mut().expect("just pushed")
    }

    /// Append a key of the given type and return it for configuration.
    pub fn key(&mut self, name: impl Into<String>, key_type: KeyType) -> &mut Key {
        self.keys.push(Key::new(name, key_type));
        self.keys.last_mut().expect("just pushed")
    }

    /// Add a BIGINT or equivalent column.
    pub fn big_integer(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::BigInt)
    }

    /// Add a BINARY or equivalent column.
    pub fn binary(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Binary)
    }

    /// Add a BOOLEAN or equivalent column.
    pub fn boolean(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Boolean)
    }

    /// Add a CHAR or equivalent column, length 100 by default.
    pub fn char(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Char).length(100)
    }

    /// Add a DATE or equivalent column.
    pub fn date(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Date)
    }

    /// Add a DATETIME or equivalent column.
    pub fn datetime(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::DateTime)
    }

    /// Add a DECIMAL or equivalent column, precision (5, 2) by default.
    pub fn decimal(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Decimal).precision_scale(5, 2)
    }

    /// Add a DOUBLE or equivalent column, precision 15 by default.
    pub fn double(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Double).precision(15)
    }

    /// Add an ENUM or equivalent column. Chain [`Column::options`] to set the
    /// allowed values.
    pub fn enumeration(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Enum)
    }

    /// Add a FLOAT or equivalent column.
    pub fn float(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Float)
    }

    /// Add an INT or equivalent column.
    pub fn integer(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Int)
    }

    /// Add a JSON or equivalent column.
    pub fn json(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Json)
    }

    /// Add a LONGTEXT or equivalent column.
    pub fn long_text(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::LongText)
    }

    /// Add a MEDIUMINT or equivalent column.
    pub fn medium_integer(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::MediumInt)
    }

    /// Add a MEDIUMTEXT or equivalent column.
    pub fn medium_text(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::MediumText)
    }

    /// Add a SMALLINT or equivalent column.
    pub fn small_integer(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::SmallInt)
    }

    /// Add a TINYINT or equivalent column.
    pub fn tiny_integer(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::TinyInt)
    }

    /// Add a VARCHAR or equivalent column, length 100 by default.
    pub fn string(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::String).length(100)
    }

    /// Add a TEXT or equivalent column.
    pub fn text(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Text)
    }

    /// Add a TIME or equivalent column.
    pub fn time(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Time)
    }

    /// Add a TIMESTAMP or equivalent column.
    pub fn timestamp(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnType::Timestamp)
    }

    /// Add an INDEX or equivalent key.
    pub fn index<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Key
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key(name, KeyType::Index).columns(columns)
    }

    /// Add a PRIMARY or equivalent key.
    pub fn primary<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Key
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key(name, KeyType::Primary).columns(columns)
    }

    /// Add a UNIQUE or equivalent key.
    pub fn unique<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Key
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key(name, KeyType::Unique).columns(columns)
    }

    /// Add a FOREIGN or equivalent key.
    pub fn foreign<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Key
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key(name, KeyType::Foreign).columns(columns)
    }

    /// Rename a column. The physical type of the existing column is preserved.
    pub fn rename_column(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.column(from, ColumnType::Custom(String::new())).rename(to);
        self
    }

    /// Drop a column by name.
    pub fn drop_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.column(name, ColumnType::Int).drop();
        self
    }

    /// Drop a key by name.
    pub fn drop_key(&mut self, name: impl Into<String>) -> &mut Self {
        self.key(name, KeyType::Index).drop();
        self
    }

    /// Drop an INDEX key by name.
    pub fn drop_index(&mut self, name: impl Into<String>) -> &mut Self {
        self.key(name, KeyType::Index).drop();
        self
    }

    /// Drop a PRIMARY key by name.
    pub fn drop_primary(&mut self, name: impl Into<String>) -> &mut Self {
        self.key(name, KeyType::Primary).drop();
        self
    }

    /// Drop a UNIQUE key by name.
    pub fn drop_unique(&mut self, name: impl Into<String>) -> &mut Self {
        self.key(name, KeyType::Unique).drop();
        self
    }

    /// Drop a FOREIGN key by name.
    pub fn drop_foreign(&mut self, name: impl Into<String>) -> &mut Self {
        self.key(name, KeyType::Foreign).drop();
        self
    }
}
