//! Migration runner.
//!
//! Migrations implement [`Migration`] and are registered by name in a
//! [`MigrationRegistry`]. [`Migrations`] compares the registry against the
//! [`Ledger`] and applies or reverts the difference: `migrate()` runs every
//! unapplied migration in ascending name order under one new batch number,
//! `rollback()` reverts the most recent batch, a row count, or everything,
//! always in descending applied order.

mod ledger;
mod registry;

pub use ledger::{Ledger, MigrationRecord, SortOrder};
pub use registry::{validate_name, MigrationRegistry};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Config;
use crate::database::Database;
use crate::error::{DbError, Result};

/// One reversible schema change.
///
/// `up` and `down` return whether the change was applied; a `false` return
/// leaves the ledger untouched, so the migration stays in its previous state.
#[async_trait]
pub trait Migration: Send + Sync {
    async fn up(&self, db: &Database) -> Result<bool>;
    async fn down(&self, db: &Database) -> Result<bool>;
}

/// Applied and still-pending migration names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: Vec<String>,
    pub available: Vec<String>,
}

/// Drives the registered migrations against one connection.
pub struct Migrations {
    db: Database,
    registry: MigrationRegistry,
    ledger: Ledger,
}

impl Migrations {
    /// Create a runner using the ledger table named by the configuration.
    pub fn new(db: Database, registry: MigrationRegistry, config: &Config) -> Self {
        let ledger = Ledger::new(db.clone(), config.migrations_table.clone());
        Self {
            db,
            registry,
            ledger,
        }
    }

    /// Create the ledger table when missing.
    pub async fn setup(&self) -> Result<bool> {
        self.ledger.setup().await
    }

    /// Names already applied and names registered but not yet applied.
    pub async fn status(&self) -> Result<MigrationStatus> {
        let applied: Vec<String> = self
            .ledger
            .applied(SortOrder::Ascending, None)
            .await?
            .into_iter()
            .map(|record| record.name)
            .collect();
        let available = self
            .registry
            .names()
            .into_iter()
            .filter(|name| !applied.iter().any(|applied| applied == name))
            .map(str::to_string)
            .collect();
        Ok(MigrationStatus { applied, available })
    }

    /// Apply every registered-but-unapplied migration, in ascending name
    /// order, under one new batch number. A failure aborts the remainder;
    /// migrations already applied in this call stay recorded.
    pub async fn migrate(&self) -> Result<()> {
        let applied = self.ledger.applied(SortOrder::Ascending, None).await?;
        let pending: Vec<_> = self
            .registry
            .iter()
            .filter(|(name, _)| !applied.iter().any(|record| record.name == *name))
            .collect();
        if pending.is_empty() {
            return Ok(());
        }
        let batch = self.ledger.latest_batch().await? + 1;
        for (name, entry) in pending {
            info!(name, batch, "applying migration");
            if entry.migration.up(&self.db).await? {
                self.ledger.store(name, entry.class, batch).await?;
            } else {
                warn!(name, "migration reported no work, not recorded");
            }
        }
        Ok(())
    }

    /// Revert applied migrations, newest first.
    ///
    /// `steps = 0` reverts the latest batch, `steps > 0` the given number of
    /// most recent rows, `steps = -1` everything. Ledger rows whose names are
    /// no longer registered are collected and reported together before any
    /// `down()` runs.
    pub async fn rollback(&self, steps: i64) -> Result<()> {
        let records = if steps == -1 {
            self.ledger.applied(SortOrder::Descending, None).await?
        } else if steps > 0 {
            self.ledger
                .applied(SortOrder::Descending, Some(steps))
                .await?
        } else {
            let batch = self.ledger.latest_batch().await?;
            self.ledger
                .applied_by_batch(batch, SortOrder::Descending)
                .await?
        };
        let mut missing = Vec::new();
        let mut runnable = Vec::new();
        for record in &records {
            match self.registry.get(&record.name) {
                Some(entry) => runnable.push((record, entry)),
                None => missing.push(record.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(DbError::MissingMigrations(missing));
        }
        for (record, entry) in runnable {
            info!(name = %record.name, batch = record.batch, "reverting migration");
            if entry.migration.down(&self.db).await? {
                self.ledger.delete(record.id).await?;
            }
        }
        // A full rollback leaves stale surrogate ids behind; clear resets them.
        if steps == -1 && !records.is_empty() && self.ledger.total().await? == 0 {
            self.ledger.clear().await?;
        }
        Ok(())
    }

    /// Revert everything, then apply everything again.
    pub async fn reset(&self) -> Result<()> {
        self.rollback(-1).await?;
        self.migrate().await
    }
}
