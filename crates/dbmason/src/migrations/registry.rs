//! Migration registry.
//!
//! Migrations are registered explicitly by the calling application under a
//! `<date>_<time>-<Identifier>` name; the registry validates the name shape
//! at registration time and iterates in ascending name order, which is the
//! application order.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::{DbError, Result};

use super::Migration;

/// A registered migration: the constructor-captured type name plus the
/// migration itself.
pub(crate) struct RegisteredMigration {
    pub(crate) class: &'static str,
    pub(crate) migration: Arc<dyn Migration>,
}

/// Ordered set of known migrations, keyed by name.
#[derive(Default)]
pub struct MigrationRegistry {
    migrations: BTreeMap<String, RegisteredMigration>,
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{8})_(\d{6})-([A-Za-z][A-Za-z0-9_]*)$").expect("hard-coded pattern")
    })
}

/// Check a migration name against the `<8-digit-date>_<6-digit-time>-<Identifier>`
/// convention, including calendar validity of the date and time parts.
pub fn validate_name(name: &str) -> Result<()> {
    let captures = name_pattern().captures(name).ok_or_else(|| {
        DbError::Precondition(format!(
            "migration name '{name}' does not match <date>_<time>-<Identifier>"
        ))
    })?;
    let date = &captures[1];
    let time = &captures[2];
    if NaiveDate::parse_from_str(date, "%Y%m%d").is_err() {
        return Err(DbError::Precondition(format!(
            "migration name '{name}' carries an invalid date '{date}'"
        )));
    }
    if NaiveTime::parse_from_str(time, "%H%M%S").is_err() {
        return Err(DbError::Precondition(format!(
            "migration name '{name}' carries an invalid time '{time}'"
        )));
    }
    Ok(())
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration under its name. The migration's type name is
    /// captured as the ledger `class` column.
    pub fn register<M>(&mut self, name: &str, migration: M) -> Result<&mut Self>
    where
        M: Migration + 'static,
    {
        validate_name(name)?;
        self.migrations.insert(
            name.to_string(),
            RegisteredMigration {
                class: std::any::type_name::<M>(),
                migration: Arc::new(migration),
            },
        );
        Ok(self)
    }

    /// Registered names, in ascending (application) order.
    pub fn names(&self) -> Vec<&str> {
        self.migrations.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&RegisteredMigration> {
        self.migrations.get(name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredMigration)> {
        self.migrations
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::database::Database;

    struct Noop;

    #[async_trait]
    impl Migration for Noop {
        async fn up(&self, _db: &Database) -> Result<bool> {
            Ok(true)
        }

        async fn down(&self, _db: &Database) -> Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_register_validates_name() {
        let mut registry = MigrationRegistry::new();
        assert!(registry.register("20240101_120000-CreateUsers", Noop).is_ok());
        assert!(registry.register("create-users", Noop).is_err());
        assert!(registry.register("20241301_120000-BadMonth", Noop).is_err());
        assert!(registry.register("20240101_250000-BadHour", Noop).is_err());
        assert!(registry.register("20240101_120000-1Leading", Noop).is_err());
    }

    #[test]
    fn test_iteration_is_ascending_by_name() {
        let mut registry = MigrationRegistry::new();
        registry.register("20240301_000000-Third", Noop).unwrap();
        registry.register("20240101_000000-First", Noop).unwrap();
        registry.register("20240201_000000-Second", Noop).unwrap();
        assert_eq!(
            registry.names(),
            [
                "20240101_000000-First",
                "20240201_000000-Second",
                "20240301_000000-Third",
            ]
        );
    }

    #[test]
    fn test_class_captures_type_name() {
        let mut registry = MigrationRegistry::new();
        registry.register("20240101_000000-First", Noop).unwrap();
        let entry = registry.get("20240101_000000-First").unwrap();
        assert!(entry.class.ends_with("Noop"));
    }
}
