//! Store-level query inputs produced by the analytics query builder.

use chrono::{DateTime, Utc};

use super::order::Order;

/// Predicate over orders: created at or after `since`, optionally with an
/// exact status match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    /// Inclusive lower bound on `created_at`.
    pub since: DateTime<Utc>,
    /// Exact, case-sensitive status text. Unknown values match nothing.
    pub status: Option<String>,
}

impl OrderFilter {
    /// Filter on the date bound only.
    #[must_use]
    pub const fn since(since: DateTime<Utc>) -> Self {
        Self {
            since,
            status: None,
        }
    }

    /// Add a status constraint.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Evaluate the filter against an in-memory order.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        order.created_at >= self.since
            && self
                .status
                .as_deref()
                .is_none_or(|status| order.status.as_str() == status)
    }
}

/// Offset/limit window for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Rows to skip.
    pub skip: i64,
    /// Maximum rows to return.
    pub limit: i64,
}
