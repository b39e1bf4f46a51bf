//! Domain models for the analytics service.

pub mod order;
pub mod query;
pub mod report;
pub mod session;

pub use order::{Order, OrderCustomer, OrderItem, OrderListing, User};
pub use query::{OrderFilter, PageWindow};
pub use report::{
    ChartPoint, ChartReport, DailyTotals, ListingPage, OrderStatusBreakdown, OrderSummary,
    OrderTotals, OrdersPage, Pagination, StatusCount, SummaryReport, SummaryTotals,
};
pub use session::{CurrentUser, keys as session_keys};
