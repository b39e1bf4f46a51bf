//! CLI command implementations.

pub mod migrate;
pub mod report;

use thiserror::Error;

use tally_admin::config::ConfigError;
use tally_admin::db::RepositoryError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A report query failed.
    #[error("Report failed: {0}")]
    Report(#[from] RepositoryError),

    /// The report could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
