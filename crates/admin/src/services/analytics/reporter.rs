//! Aggregation reporter.
//!
//! Turns store aggregates into the summary, chart and listing payloads.
//! Each report is one store call, so its numbers come from one snapshot.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::instrument;

use tally_core::{OrderStatus, RangeToken, resolve_range_start, round_to_cents};

use super::params::AnalyticsParams;
use crate::db::{OrderStore, RepositoryError};
use crate::models::{
    ChartPoint, ChartReport, ListingPage, OrderFilter, OrderStatusBreakdown, OrderSummary,
    OrdersPage, Pagination, StatusCount, SummaryReport, SummaryTotals,
};

/// Source of the current instant.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Builds analytics reports from an [`OrderStore`].
#[derive(Clone)]
pub struct AnalyticsReporter {
    store: Arc<dyn OrderStore>,
    offset: FixedOffset,
    clock: Clock,
}

impl fmt::Debug for AnalyticsReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsReporter")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl AnalyticsReporter {
    /// Create a reporter that reads the system clock and groups days in
    /// `offset`.
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>, offset: FixedOffset) -> Self {
        Self {
            store,
            offset,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Start of the reporting window for `range`, evaluated now.
    #[must_use]
    pub fn range_start(&self, range: RangeToken) -> DateTime<Utc> {
        let now = (self.clock)().with_timezone(&self.offset);
        resolve_range_start(range, &now)
    }

    /// Headline totals and status breakdown.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    #[instrument(skip_all, fields(range = %range))]
    pub async fn summary(&self, range: RangeToken) -> Result<SummaryReport, RepositoryError> {
        let filter = OrderFilter::since(self.range_start(range));
        let OrderSummary { totals, statuses } = self.store.summary(&filter).await?;

        tracing::debug!(orders = totals.orders, "summary computed");

        Ok(SummaryReport {
            summary: SummaryTotals {
                total_orders: totals.orders,
                total_revenue: round_to_cents(totals.revenue),
                active_users: totals.active_users,
            },
            order_status: status_breakdown(&statuses),
        })
    }

    /// Per-day order count and revenue, ascending by date.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    #[instrument(skip_all, fields(range = %range))]
    pub async fn orders_chart(&self, range: RangeToken) -> Result<ChartReport, RepositoryError> {
        let filter = OrderFilter::since(self.range_start(range));
        let days = self.store.daily_totals(&filter, self.offset).await?;

        let mut chart_data: Vec<ChartPoint> = days
            .into_iter()
            .map(|day| ChartPoint {
                date: day.date,
                orders: day.orders,
                revenue: round_to_cents(day.revenue),
            })
            .collect();
        chart_data.sort_by(|a, b| a.date.cmp(&b.date));

        tracing::debug!(days = chart_data.len(), "chart computed");
        Ok(ChartReport { chart_data })
    }

    /// One page of orders, newest first, with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    #[instrument(
        skip_all,
        fields(range = %params.date_range, page = params.page, limit = params.limit)
    )]
    pub async fn orders_list(
        &self,
        params: &AnalyticsParams,
    ) -> Result<OrdersPage, RepositoryError> {
        let filter = params.order_filter(self.range_start(params.date_range));
        let ListingPage { orders, total } =
            self.store.page(&filter, params.page_window()).await?;

        Ok(OrdersPage {
            orders,
            pagination: Pagination::new(params.page, params.limit, total),
        })
    }
}

/// Map per-status counts onto the fixed breakdown. Statuses outside the
/// breakdown are ignored; `cancelled` stays zero.
fn status_breakdown(counts: &[StatusCount]) -> OrderStatusBreakdown {
    let mut breakdown = OrderStatusBreakdown::default();
    for StatusCount { status, count } in counts {
        match status.parse::<OrderStatus>() {
            Ok(OrderStatus::Delivered) => breakdown.completed += count,
            Ok(OrderStatus::Placed) => breakdown.placed += count,
            Ok(OrderStatus::Preparing) => breakdown.preparing += count,
            Ok(OrderStatus::Cancelled) | Err(_) => {}
        }
    }
    breakdown
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use rust_decimal::Decimal;
    use tally_core::{OrderId, UserId};

    use super::*;
    use crate::db::MemoryOrderStore;
    use crate::models::Order;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn order(id: i32, user: i32, total: Decimal, status: OrderStatus, age_hours: i64) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: Some(UserId::new(user)),
            items: vec![],
            total,
            status,
            created_at: now() - TimeDelta::hours(age_hours),
        }
    }

    fn reporter(store: MemoryOrderStore) -> AnalyticsReporter {
        AnalyticsReporter::new(Arc::new(store), FixedOffset::east_opt(0).unwrap()).with_clock(now)
    }

    #[tokio::test]
    async fn test_summary_today() {
        let store = MemoryOrderStore::new().with_orders([
            order(1, 1, Decimal::new(10_005, 3), OrderStatus::Delivered, 1),
            order(2, 2, Decimal::new(5, 0), OrderStatus::Placed, 2),
            order(3, 1, Decimal::ZERO, OrderStatus::Preparing, 3),
            // Yesterday, outside "today".
            order(4, 3, Decimal::new(100, 0), OrderStatus::Delivered, 20),
        ]);

        let report = reporter(store).summary(RangeToken::Today).await.unwrap();

        assert_eq!(report.summary.total_orders, 3);
        assert_eq!(report.summary.total_revenue, Decimal::new(1501, 2));
        assert_eq!(report.summary.active_users, 2);
        assert_eq!(
            report.order_status,
            OrderStatusBreakdown {
                completed: 1,
                cancelled: 0,
                placed: 1,
                preparing: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_summary_status_sum_never_exceeds_total() {
        let store = MemoryOrderStore::new().with_orders((1..=12).map(|id| {
            let index = usize::try_from(id).unwrap() % OrderStatus::ALL.len();
            order(id, id, Decimal::ONE, OrderStatus::ALL[index], i64::from(id))
        }));

        let report = reporter(store).summary(RangeToken::AllTime).await.unwrap();
        let s = report.order_status;

        assert_eq!(s.cancelled, 0);
        assert!(s.completed + s.placed + s.preparing + s.cancelled <= report.summary.total_orders);
    }

    #[tokio::test]
    async fn test_summary_empty_store() {
        let report = reporter(MemoryOrderStore::new())
            .summary(RangeToken::LastSevenDays)
            .await
            .unwrap();

        assert_eq!(report.summary.total_orders, 0);
        assert_eq!(report.summary.total_revenue, Decimal::ZERO);
        assert_eq!(report.order_status, OrderStatusBreakdown::default());
    }

    #[tokio::test]
    async fn test_chart_is_ascending_and_rounded() {
        let store = MemoryOrderStore::new().with_orders([
            order(1, 1, Decimal::new(1_005, 3), OrderStatus::Placed, 1),
            order(2, 1, Decimal::new(2_000, 3), OrderStatus::Placed, 2),
            order(3, 1, Decimal::new(7, 0), OrderStatus::Placed, 30),
            order(4, 1, Decimal::new(9, 0), OrderStatus::Placed, 60),
        ]);

        let chart = reporter(store)
            .orders_chart(RangeToken::LastSevenDays)
            .await
            .unwrap()
            .chart_data;

        let dates: Vec<_> = chart.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, ["2026-10-17", "2026-10-18", "2026-10-19"]);
        assert_eq!(chart[2].orders, 2);
        assert_eq!(chart[2].revenue, Decimal::new(301, 2));
    }

    #[tokio::test]
    async fn test_chart_empty() {
        let chart = reporter(MemoryOrderStore::new())
            .orders_chart(RangeToken::Today)
            .await
            .unwrap();
        assert!(chart.chart_data.is_empty());
    }

    #[tokio::test]
    async fn test_orders_list_last_page() {
        let store = MemoryOrderStore::new().with_orders(
            (1..=25).map(|id| order(id, 1, Decimal::ONE, OrderStatus::Placed, i64::from(id))),
        );
        let params = AnalyticsParams {
            date_range: RangeToken::AllTime,
            page: 3,
            limit: 10,
            ..AnalyticsParams::default()
        };

        let page = reporter(store).orders_list(&params).await.unwrap();

        assert_eq!(page.orders.len(), 5);
        assert_eq!(
            page.pagination,
            Pagination {
                current_page: 3,
                total_pages: 3,
                total_orders: 25,
                limit: 10,
            }
        );
        // Newest first: the oldest five orders are on the last page.
        assert_eq!(page.orders[0].id, OrderId::new(21));
    }

    #[tokio::test]
    async fn test_orders_list_filters_by_status() {
        let store = MemoryOrderStore::new().with_orders([
            order(1, 1, Decimal::ONE, OrderStatus::Placed, 1),
            order(2, 1, Decimal::ONE, OrderStatus::Delivered, 2),
        ]);
        let params = AnalyticsParams {
            status: Some("Delivered".to_string()),
            ..AnalyticsParams::default()
        };

        let page = reporter(store).orders_list(&params).await.unwrap();
        assert_eq!(page.pagination.total_orders, 1);
        assert_eq!(page.orders[0].status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let err = reporter(MemoryOrderStore::new().failing("down"))
            .summary(RangeToken::Today)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Unavailable(_)));
    }

    #[test]
    fn test_status_breakdown_ignores_unknown() {
        let counts = [("Delivered", 4), ("Cancelled", 2), ("Shipped", 9)]
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            });
        let breakdown = status_breakdown(&counts);
        assert_eq!(breakdown.completed, 4);
        assert_eq!(breakdown.cancelled, 0);
        assert_eq!(breakdown.placed + breakdown.preparing, 0);
    }
}
