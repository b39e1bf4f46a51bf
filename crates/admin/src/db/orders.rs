//! `PostgreSQL` order store.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database or an offline query cache. Every query shares the
//! same `WHERE` clause, bound as `$1` (since) and `$2` (optional status).
//!
//! Reports that need more than one statement run them in a `REPEATABLE READ`
//! read-only transaction, so an order committed mid-report is either counted
//! by every statement or by none.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use tally_core::{OrderId, OrderStatus};

use super::{OrderStore, RepositoryError};
use crate::models::{
    DailyTotals, ListingPage, OrderCustomer, OrderFilter, OrderItem, OrderListing, OrderSummary,
    OrderTotals, PageWindow, StatusCount,
};

/// Shared predicate for all analytics queries.
const ORDER_FILTER: &str = "o.created_at >= $1 AND ($2::text IS NULL OR o.status = $2)";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct TotalsRow {
    orders: i64,
    revenue: Decimal,
    active_users: i64,
}

impl From<TotalsRow> for OrderTotals {
    fn from(row: TotalsRow) -> Self {
        Self {
            orders: row.orders,
            revenue: row.revenue,
            active_users: row.active_users,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct DailyTotalsRow {
    date: String,
    orders: i64,
    revenue: Decimal,
}

/// Internal row type for the listing query (order joined with its user).
#[derive(Debug, sqlx::FromRow)]
struct OrderListingRow {
    id: i32,
    items: Json<Vec<OrderItem>>,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    user_name: Option<String>,
    user_email: Option<String>,
}

impl TryFrom<OrderListingRow> for OrderListing {
    type Error = RepositoryError;

    fn try_from(row: OrderListingRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", row.id)))?;

        let user = match (row.user_name, row.user_email) {
            (Some(name), Some(email)) => Some(OrderCustomer { name, email }),
            _ => None,
        };

        Ok(Self {
            id: OrderId::new(row.id),
            user,
            items: row.items.0,
            total: row.total,
            status,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Order store backed by the storefront's `PostgreSQL` database.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a read-only transaction whose statements all see the same
    /// snapshot of the tables.
    async fn snapshot(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn summary(&self, filter: &OrderFilter) -> Result<OrderSummary, RepositoryError> {
        let totals_sql = format!(
            r"
            SELECT COUNT(*) AS orders,
                   COALESCE(SUM(o.total), 0) AS revenue,
                   COUNT(DISTINCT o.user_id) AS active_users
            FROM orders o
            WHERE {ORDER_FILTER}
            "
        );
        let statuses_sql = format!(
            r"
            SELECT o.status, COUNT(*) AS count
            FROM orders o
            WHERE {ORDER_FILTER}
            GROUP BY o.status
            "
        );

        let mut tx = self.snapshot().await?;

        let totals = sqlx::query_as::<_, TotalsRow>(&totals_sql)
            .bind(filter.since)
            .bind(filter.status.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let statuses = sqlx::query_as::<_, StatusCountRow>(&statuses_sql)
            .bind(filter.since)
            .bind(filter.status.as_deref())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderSummary {
            totals: totals.into(),
            statuses: statuses
                .into_iter()
                .map(|row| StatusCount {
                    status: row.status,
                    count: row.count,
                })
                .collect(),
        })
    }

    async fn daily_totals(
        &self,
        filter: &OrderFilter,
        offset: FixedOffset,
    ) -> Result<Vec<DailyTotals>, RepositoryError> {
        // Shift the UTC wall time by the reporting offset before taking the date.
        let sql = format!(
            r"
            SELECT to_char((o.created_at AT TIME ZONE 'UTC') + make_interval(secs => $3),
                           'YYYY-MM-DD') AS date,
                   COUNT(*) AS orders,
                   COALESCE(SUM(o.total), 0) AS revenue
            FROM orders o
            WHERE {ORDER_FILTER}
            GROUP BY 1
            ORDER BY 1 ASC
            "
        );

        let rows = sqlx::query_as::<_, DailyTotalsRow>(&sql)
            .bind(filter.since)
            .bind(filter.status.as_deref())
            .bind(f64::from(offset.local_minus_utc()))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyTotals {
                date: row.date,
                orders: row.orders,
                revenue: row.revenue,
            })
            .collect())
    }

    async fn page(
        &self,
        filter: &OrderFilter,
        window: PageWindow,
    ) -> Result<ListingPage, RepositoryError> {
        let count_sql = format!("SELECT COUNT(*) FROM orders o WHERE {ORDER_FILTER}");
        let list_sql = format!(
            r"
            SELECT o.id, o.items, o.total, o.status, o.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            WHERE {ORDER_FILTER}
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $3 OFFSET $4
            "
        );

        let mut tx = self.snapshot().await?;

        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.since)
            .bind(filter.status.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, OrderListingRow>(&list_sql)
            .bind(filter.since)
            .bind(filter.status.as_deref())
            .bind(window.limit)
            .bind(window.skip)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let orders = rows
            .into_iter()
            .map(OrderListing::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListingPage { orders, total })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
