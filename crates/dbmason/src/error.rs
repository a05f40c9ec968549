//! Error types for the toolkit.

use thiserror::Error;

/// Main error type for database, schema and migration operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Configuration error (invalid YAML, missing fields, bad identifiers).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection could not be established.
    #[error("Connection error on adapter '{adapter}': {message}")]
    Connection { adapter: String, message: String },

    /// A statement failed inside the driver. Carries the adapter name of the
    /// originating connection so the failure can be traced back.
    #[error("Execution error on adapter '{adapter}': {message}")]
    Execution { adapter: String, message: String },

    /// The requested operation cannot be expressed on the active dialect.
    /// Raised before any SQL is sent.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A precondition did not hold (scalar query returned a non-scalar row,
    /// a referenced path is missing, etc.).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Ledger rows reference migrations that are no longer registered.
    /// The whole set is collected before failing.
    #[error("Missing migrations that can not be rolled back: {}", .0.join(", "))]
    MissingMigrations(Vec<String>),

    /// IO error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DbError {
    /// Create a Connection error for the named adapter.
    pub fn connection(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::Connection {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Create an Execution error for the named adapter.
    pub fn execution(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::Execution {
            adapter: adapter.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, DbError>;
