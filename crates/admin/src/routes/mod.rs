//! HTTP route handlers for the analytics service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (pings the order store)
//!
//! # Analytics (admin only)
//! GET  /api/analytics/summary         - Totals and status breakdown
//! GET  /api/analytics/orders-chart    - Per-day orders and revenue
//! GET  /api/analytics/orders          - Paginated order listing
//! ```

pub mod analytics;
pub mod health;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Prefix the analytics router is mounted under.
pub const ANALYTICS_PREFIX: &str = "/api/analytics";

/// Build the complete router.
///
/// Session handling is left to the caller: the analytics routes expect a
/// `tower_sessions::Session` in the request extensions.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest(ANALYTICS_PREFIX, analytics::router())
}
