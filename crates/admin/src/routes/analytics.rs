//! Analytics route handlers.
//!
//! All three endpoints are read-only and admin-gated. The guard runs as a
//! route layer, so a refused request never reaches the reporter.
//!
//! Query strings are extracted as plain key/value pairs, which cannot fail
//! to deserialize; [`AnalyticsQuery`] picks the keys it knows.

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::require_admin,
    models::{ChartReport, CurrentUser, OrdersPage, SummaryReport},
    services::{AnalyticsParams, AnalyticsQuery},
    state::AppState,
};

/// Build the analytics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/orders-chart", get(orders_chart))
        .route("/orders", get(orders))
        .route_layer(middleware::from_fn(require_admin))
}

/// Headline totals and order status breakdown for a date range.
///
/// # Errors
///
/// Returns 500 with `{message, error}` if the store fails.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn summary(
    Extension(admin): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SummaryReport>, AppError> {
    let params = AnalyticsParams::from(pairs.into_iter().collect::<AnalyticsQuery>());

    let report = state
        .reporter()
        .summary(params.date_range)
        .await
        .map_err(|e| AppError::report("Failed to fetch order summary", e))?;

    Ok(Json(report))
}

/// Per-day orders and revenue for a date range.
///
/// # Errors
///
/// Returns 500 with `{message, error}` if the store fails.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn orders_chart(
    Extension(admin): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ChartReport>, AppError> {
    let params = AnalyticsParams::from(pairs.into_iter().collect::<AnalyticsQuery>());

    let chart = state
        .reporter()
        .orders_chart(params.date_range)
        .await
        .map_err(|e| AppError::report("Failed to fetch orders chart", e))?;

    Ok(Json(chart))
}

/// Paginated order listing, newest first.
///
/// # Errors
///
/// Returns 500 with `{message, error}` if the store fails.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn orders(
    Extension(admin): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<OrdersPage>, AppError> {
    let params = AnalyticsParams::from(pairs.into_iter().collect::<AnalyticsQuery>());

    let page = state
        .reporter()
        .orders_list(&params)
        .await
        .map_err(|e| AppError::report("Failed to fetch orders", e))?;

    tracing::debug!(
        returned = page.orders.len(),
        total = page.pagination.total_orders,
        "orders listed"
    );
    Ok(Json(page))
}
