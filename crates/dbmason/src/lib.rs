//! dbmason — database access toolkit.
//!
//! Three layers, each usable on its own:
//!
//! - **Connection**: [`Database`] wraps any [`Executor`] implementation (the
//!   driver seam) with statement execution, scalar queries and transaction
//!   control.
//! - **Schema**: [`Schema`] renders fluent [`Table`] descriptions into
//!   dialect-specific DDL for MySQL and SQLite, and answers catalog questions.
//! - **Migrations**: [`Migrations`] tracks reversible schema changes in a
//!   batch-numbered ledger table, applying and reverting them through the
//!   schema layer.
//!
//! The generated SQL is treated as a compatibility surface: quoting, clause
//! ordering and whitespace are exact and covered by golden-string tests.
//!
//! [`Executor`]: executor::Executor
//! [`Database`]: database::Database
//! [`Schema`]: schema::Schema
//! [`Table`]: schema::table::Table
//! [`Migrations`]: migrations::Migrations

pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod migrations;
pub mod schema;

pub use config::{Config, Dialect};
pub use database::Database;
pub use error::{DbError, Result};
pub use executor::{Executor, Params, Row, Value};
pub use migrations::{Migration, MigrationRegistry, Migrations};
pub use schema::table::Table;
pub use schema::Schema;
