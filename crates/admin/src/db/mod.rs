//! Order store access for the analytics service.
//!
//! # Database
//!
//! Reads the storefront's `PostgreSQL` tables; nothing here writes to them.
//!
//! - `users` - Customer and admin accounts (name, email, role)
//! - `orders` - Orders with JSONB line items, numeric total, text status
//! - `admin.session` - Session store shared with the login service
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p tally-cli -- migrate
//! ```

pub mod memory;
pub mod orders;

use std::time::Duration;

use async_trait::async_trait;
use chrono::FixedOffset;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::{DailyTotals, ListingPage, OrderFilter, OrderSummary, PageWindow};

pub use memory::MemoryOrderStore;
pub use orders::PgOrderStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store could not be reached or refused the query.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only queries the analytics reports are built from.
///
/// Each method answers one report from a single snapshot of the orders:
/// aggregates returned together must agree with each other even while
/// orders are being written. Implementations must be safe to share between
/// concurrent requests.
#[async_trait]
pub trait OrderStore: Send + Sync + std::fmt::Debug {
    /// Count, revenue sum and distinct-user count of matching orders, with
    /// the matching order counts grouped by status text.
    async fn summary(&self, filter: &OrderFilter) -> Result<OrderSummary, RepositoryError>;

    /// Matching orders grouped by calendar day in `offset`, oldest day first.
    async fn daily_totals(
        &self,
        filter: &OrderFilter,
        offset: FixedOffset,
    ) -> Result<Vec<DailyTotals>, RepositoryError>;

    /// One page of matching orders, newest first, with customers resolved,
    /// and the number of matching orders across all pages.
    async fn page(
        &self,
        filter: &OrderFilter,
        window: PageWindow,
    ) -> Result<ListingPage, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
