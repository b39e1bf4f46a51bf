//! In-memory order store.
//!
//! Evaluates the same queries as [`super::PgOrderStore`] over plain vectors.
//! Used by tests and by anything that needs reports without a database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::FixedOffset;
use rust_decimal::Decimal;

use tally_core::UserId;

use super::{OrderStore, RepositoryError};
use crate::models::{
    DailyTotals, ListingPage, Order, OrderCustomer, OrderFilter, OrderListing, OrderSummary,
    OrderTotals, PageWindow, StatusCount, User,
};

/// Order store over in-process data.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    users: HashMap<UserId, User>,
    orders: Vec<Order>,
    failure: Option<String>,
    queries: AtomicUsize,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user.
    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add several orders.
    #[must_use]
    pub fn with_orders(mut self, orders: impl IntoIterator<Item = Order>) -> Self {
        self.orders.extend(orders);
        self
    }

    /// Make every query fail with `RepositoryError::Unavailable(reason)`.
    #[must_use]
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Number of queries executed so far (including failed ones).
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn matching<'a>(
        &'a self,
        filter: &'a OrderFilter,
    ) -> Result<impl Iterator<Item = &'a Order> + 'a, RepositoryError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if let Some(reason) = &self.failure {
            return Err(RepositoryError::Unavailable(reason.clone()));
        }
        Ok(self.orders.iter().filter(move |order| filter.matches(order)))
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn summary(&self, filter: &OrderFilter) -> Result<OrderSummary, RepositoryError> {
        let mut totals = OrderTotals::default();
        let mut users = HashSet::new();
        let mut statuses: BTreeMap<&'static str, i64> = BTreeMap::new();

        for order in self.matching(filter)? {
            totals.orders += 1;
            totals.revenue += order.total;
            if let Some(user_id) = order.user_id {
                users.insert(user_id);
            }
            *statuses.entry(order.status.as_str()).or_insert(0) += 1;
        }

        totals.active_users = i64::try_from(users.len())
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(OrderSummary {
            totals,
            statuses: statuses
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: status.to_string(),
                    count,
                })
                .collect(),
        })
    }

    async fn daily_totals(
        &self,
        filter: &OrderFilter,
        offset: FixedOffset,
    ) -> Result<Vec<DailyTotals>, RepositoryError> {
        // BTreeMap keeps the YYYY-MM-DD keys in ascending order.
        let mut days: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
        for order in self.matching(filter)? {
            let date = order
                .created_at
                .with_timezone(&offset)
                .format("%Y-%m-%d")
                .to_string();
            let day = days.entry(date).or_insert((0, Decimal::ZERO));
            day.0 += 1;
            day.1 += order.total;
        }

        Ok(days
            .into_iter()
            .map(|(date, (orders, revenue))| DailyTotals {
                date,
                orders,
                revenue,
            })
            .collect())
    }

    async fn page(
        &self,
        filter: &OrderFilter,
        window: PageWindow,
    ) -> Result<ListingPage, RepositoryError> {
        let mut orders: Vec<&Order> = self.matching(filter)?.collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = i64::try_from(orders.len())
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let skip = usize::try_from(window.skip.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit.max(0)).unwrap_or(usize::MAX);

        let orders = orders
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|order| OrderListing {
                id: order.id,
                user: order
                    .user_id
                    .and_then(|id| self.users.get(&id))
                    .map(OrderCustomer::from),
                items: order.items.clone(),
                total: order.total,
                status: order.status,
                created_at: order.created_at,
            })
            .collect();

        Ok(ListingPage { orders, total })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        match &self.failure {
            Some(reason) => Err(RepositoryError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use tally_core::{OrderId, OrderStatus, UserRole};

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    fn order(
        id: i32,
        user: Option<i32>,
        total: i64,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: user.map(UserId::new),
            items: vec![],
            total: Decimal::new(total, 2),
            status,
            created_at,
        }
    }

    fn store() -> MemoryOrderStore {
        MemoryOrderStore::new()
            .with_user(User {
                id: UserId::new(1),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: UserRole::Customer,
            })
            .with_orders([
                order(1, Some(1), 1000, OrderStatus::Placed, at(17, 23)),
                order(2, Some(1), 500, OrderStatus::Delivered, at(18, 1)),
                order(3, Some(2), 250, OrderStatus::Delivered, at(18, 9)),
                order(4, None, 100, OrderStatus::Preparing, at(19, 10)),
            ])
    }

    fn everything() -> OrderFilter {
        OrderFilter::since(DateTime::<Utc>::default())
    }

    #[tokio::test]
    async fn test_summary_counts_distinct_users() {
        let summary = store().summary(&everything()).await.unwrap();

        assert_eq!(summary.totals.orders, 4);
        assert_eq!(summary.totals.revenue, Decimal::new(1850, 2));
        // Orders without a user are not counted as an active user.
        assert_eq!(summary.totals.active_users, 2);
    }

    #[tokio::test]
    async fn test_summary_status_counts_match_totals() {
        let store = store();
        let summary = store.summary(&everything()).await.unwrap();

        let delivered = summary
            .statuses
            .iter()
            .find(|c| c.status == "Delivered")
            .unwrap();
        assert_eq!(delivered.count, 2);
        assert_eq!(
            summary.statuses.iter().map(|c| c.count).sum::<i64>(),
            summary.totals.orders
        );
        // Totals and status counts come from one pass over the orders.
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_daily_totals_respect_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let days = store().daily_totals(&everything(), utc).await.unwrap();
        let keys: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(keys, ["2026-10-17", "2026-10-18", "2026-10-19"]);

        // At UTC+2 the 23:00 order on the 17th lands on the 18th.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let days = store().daily_totals(&everything(), plus_two).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2026-10-18");
        assert_eq!(days[0].orders, 3);
        assert_eq!(days[0].revenue, Decimal::new(1750, 2));
    }

    #[tokio::test]
    async fn test_page_is_newest_first_and_windowed() {
        let store = store();
        let page = store
            .page(&everything(), PageWindow { skip: 1, limit: 2 })
            .await
            .unwrap();

        let ids: Vec<_> = page.orders.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, [3, 2]);
        assert_eq!(page.total, 4);
        // User 2 does not exist, so the reference resolves to nothing.
        assert!(page.orders[0].user.is_none());
        assert_eq!(page.orders[1].user.as_ref().unwrap().name, "Ada");
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_page_past_the_end_still_counts() {
        let page = store()
            .page(&everything(), PageWindow { skip: 10, limit: 2 })
            .await
            .unwrap();

        assert!(page.orders.is_empty());
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_failing_store_reports_unavailable_and_counts_queries() {
        let store = store().failing("connection refused");
        let err = store.summary(&everything()).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Unavailable(ref m) if m == "connection refused"));
        assert_eq!(store.query_count(), 1);
        assert!(store.ping().await.is_err());
    }
}
