//! Order analytics: query parameters and report construction.
//!
//! [`AnalyticsParams`] turns raw query-string values into an order filter
//! and page window; [`AnalyticsReporter`] runs the store queries and shapes
//! the results.

mod params;
mod reporter;

pub use params::{
    ALL_STATUSES, AnalyticsParams, AnalyticsQuery, DEFAULT_DATE_RANGE, DEFAULT_LIMIT,
    DEFAULT_PAGE,
};
pub use reporter::{AnalyticsReporter, Clock};
