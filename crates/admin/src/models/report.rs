//! Aggregates returned by the order store and the report payloads built
//! from them.
//!
//! Payload types serialize to the exact JSON bodies of the analytics
//! endpoints; monetary fields are JSON numbers rounded to cents.

use rust_decimal::Decimal;
use serde::Serialize;

use super::order::OrderListing;

// =============================================================================
// Store Aggregates
// =============================================================================

/// Scalar aggregates over a filtered set of orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    /// Matching order count.
    pub orders: i64,
    /// Unrounded sum of `total` (zero when nothing matches).
    pub revenue: Decimal,
    /// Distinct user references among the matching orders.
    pub active_users: i64,
}

/// Order count for one status value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Totals and per-status counts read from one snapshot, so the status
/// counts never sum to more than `totals.orders`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSummary {
    pub totals: OrderTotals,
    pub statuses: Vec<StatusCount>,
}

/// One page of listings and the full match count, read from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    pub orders: Vec<OrderListing>,
    /// Matching orders across all pages.
    pub total: i64,
}

/// Per-day aggregates; `date` is a `YYYY-MM-DD` key in the reporting timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotals {
    pub date: String,
    pub orders: i64,
    /// Unrounded revenue for the day.
    pub revenue: Decimal,
}

// =============================================================================
// Summary
// =============================================================================

/// `GET /summary` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub summary: SummaryTotals,
    pub order_status: OrderStatusBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub active_users: i64,
}

/// Order counts by lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderStatusBreakdown {
    /// Orders in `Delivered`.
    pub completed: i64,
    /// Always zero: cancellation is not tracked yet.
    pub cancelled: i64,
    pub placed: i64,
    pub preparing: i64,
}

// =============================================================================
// Chart
// =============================================================================

/// `GET /orders-chart` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReport {
    pub chart_data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

// =============================================================================
// Listing
// =============================================================================

/// `GET /orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrdersPage {
    pub orders: Vec<OrderListing>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_orders: i64,
    pub limit: i64,
}

impl Pagination {
    /// Build pagination metadata; `total_pages` is `ceil(total / limit)`.
    #[must_use]
    pub const fn new(current_page: i64, limit: i64, total_orders: i64) -> Self {
        let total_pages = if limit > 0 {
            total_orders / limit + if total_orders % limit == 0 { 0 } else { 1 }
        } else {
            0
        };
        Self {
            current_page,
            total_pages,
            total_orders,
            limit,
        }
    }
}
