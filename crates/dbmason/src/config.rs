//! Configuration loading and validation.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DbError, Result};

/// Supported SQL dialects.
///
/// The dialect is an explicit configuration tag; nothing in this crate
/// inspects the concrete executor type to guess it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Mysql,
    Sqlite,
}

impl Dialect {
    /// Lowercase dialect name, for logging and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Toolkit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Dialect spoken by the configured connection.
    pub dialect: Dialect,

    /// Name of the migration ledger table.
    #[serde(default = "default_migrations_table")]
    pub migrations_table: String,
}

fn default_migrations_table() -> String {
    "migration".to_string()
}

impl Config {
    /// Create a configuration with default settings for the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            migrations_table: default_migrations_table(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.migrations_table.is_empty() {
            return Err(DbError::Config(
                "migrations_table cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_with_defaults() {
        let config = Config::from_yaml("dialect: mysql").unwrap();
        assert_eq!(config.dialect, Dialect::Mysql);
        assert_eq!(config.migrations_table, "migration");
    }

    #[test]
    fn test_from_yaml_explicit_table() {
        let yaml = "dialect: sqlite\nmigrations_table: schema_history\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.dialect, Dialect::Sqlite);
        assert_eq!(config.migrations_table, "schema_history");
    }

    #[test]
    fn test_rejects_unknown_dialect() {
        assert!(Config::from_yaml("dialect: oracle").is_err());
    }

    #[test]
    fn test_rejects_empty_table_name() {
        let result = Config::from_yaml("dialect: mysql\nmigrations_table: \"\"\n");
        assert!(matches!(result, Err(DbError::Config(_))));
    }
}
