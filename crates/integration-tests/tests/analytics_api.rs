//! Integration tests for the admin analytics API.
//!
//! Drives the assembled router (session layer, admin guard, handlers and
//! error rendering) over an in-memory order store.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde_json::json;

use tally_admin::db::MemoryOrderStore;
use tally_core::OrderStatus;
use tally_integration_tests::{TestApp, order, user};

const ENDPOINTS: [&str; 3] = [
    "/api/analytics/summary",
    "/api/analytics/orders-chart",
    "/api/analytics/orders",
];

fn seeded_store() -> MemoryOrderStore {
    MemoryOrderStore::new()
        .with_user(user(1, "Ada"))
        .with_user(user(2, "Grace"))
        .with_orders([
            order(1, Some(1), Decimal::new(10_005, 3), OrderStatus::Delivered, 1),
            order(2, Some(2), Decimal::new(5, 0), OrderStatus::Placed, 2),
            order(3, Some(1), Decimal::ZERO, OrderStatus::Preparing, 3),
            // 2026-10-16 12:00, inside the last seven days but not today
            order(4, None, Decimal::new(4_250, 3), OrderStatus::Delivered, 72),
            // 2026-10-09 12:00, outside the last seven days
            order(5, Some(7), Decimal::new(20, 0), OrderStatus::Cancelled, 240),
        ])
}

// =============================================================================
// Access Guard
// =============================================================================

#[tokio::test]
async fn test_customer_is_forbidden_without_touching_store() {
    let app = TestApp::new(seeded_store());

    for uri in ENDPOINTS {
        let (status, body) = app.get_json(uri, Some("customer")).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body, json!({"message": "Admin access required"}), "{uri}");
    }

    assert_eq!(app.store.query_count(), 0);
}

#[tokio::test]
async fn test_anonymous_is_unauthenticated_without_touching_store() {
    let app = TestApp::new(seeded_store());

    for uri in ENDPOINTS {
        let (status, body) = app.get_json(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, json!({"message": "Not authenticated"}), "{uri}");
    }

    assert_eq!(app.store.query_count(), 0);
}

// =============================================================================
// Summary
// =============================================================================

#[tokio::test]
async fn test_summary_today() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app
        .get_json("/api/analytics/summary?dateRange=today", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "summary": {"totalOrders": 3, "totalRevenue": 15.01, "activeUsers": 2},
            "orderStatus": {"completed": 1, "cancelled": 0, "placed": 1, "preparing": 1}
        })
    );
}

#[tokio::test]
async fn test_summary_defaults_to_last_seven_days() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app.get_json("/api/analytics/summary", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["totalOrders"], 4);
    // 10.005 + 5 + 0 + 4.25 = 19.255
    assert_eq!(body["summary"]["totalRevenue"], json!(19.26));
    // The user-less order does not add an active user.
    assert_eq!(body["summary"]["activeUsers"], 2);
    assert_eq!(body["orderStatus"]["completed"], 2);
}

#[tokio::test]
async fn test_summary_unknown_range_means_all_time() {
    let app = TestApp::new(seeded_store());

    let (_, body) = app
        .get_json("/api/analytics/summary?dateRange=30days", Some("admin"))
        .await;

    assert_eq!(body["summary"]["totalOrders"], 5);
    // Cancelled orders are never reported in the breakdown.
    assert_eq!(body["orderStatus"]["cancelled"], 0);
}

// =============================================================================
// Chart
// =============================================================================

#[tokio::test]
async fn test_chart_groups_by_day_ascending() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app
        .get_json("/api/analytics/orders-chart", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "chartData": [
                {"date": "2026-10-16", "orders": 1, "revenue": 4.25},
                {"date": "2026-10-19", "orders": 3, "revenue": 15.01}
            ]
        })
    );
}

#[tokio::test]
async fn test_chart_day_keys_follow_reporting_offset() {
    // At UTC-05:00, 08:00 UTC on the 19th is 03:00 local on the 19th, while
    // 01:00 UTC is still the evening of the 18th.
    let store = MemoryOrderStore::new().with_orders([
        order(1, Some(1), Decimal::ONE, OrderStatus::Placed, 4),
        order(2, Some(1), Decimal::ONE, OrderStatus::Placed, 11),
    ]);
    let app = TestApp::with_offset(store, FixedOffset::west_opt(5 * 3600).unwrap());

    let (_, body) = app
        .get_json("/api/analytics/orders-chart?dateRange=all", Some("admin"))
        .await;

    let dates: Vec<_> = body["chartData"]
        .as_array()
        .unwrap()
        .iter()
        .map(|point| point["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, ["2026-10-18", "2026-10-19"]);
}

#[tokio::test]
async fn test_chart_empty() {
    let app = TestApp::new(MemoryOrderStore::new());

    let (status, body) = app
        .get_json("/api/analytics/orders-chart?dateRange=today", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"chartData": []}));
}

// =============================================================================
// Order Listing
// =============================================================================

#[tokio::test]
async fn test_orders_last_page() {
    let store = MemoryOrderStore::new().with_user(user(1, "Ada")).with_orders(
        (1..=25).map(|id| order(id, Some(1), Decimal::ONE, OrderStatus::Placed, i64::from(id))),
    );
    let app = TestApp::new(store);

    let (status, body) = app
        .get_json("/api/analytics/orders?dateRange=all&page=3&limit=10", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["pagination"],
        json!({"currentPage": 3, "totalPages": 3, "totalOrders": 25, "limit": 10})
    );
}

#[tokio::test]
async fn test_orders_listing_shape() {
    let app = TestApp::new(seeded_store());

    let (_, body) = app
        .get_json("/api/analytics/orders?limit=2", Some("admin"))
        .await;

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);

    // Newest first.
    let newest = &orders[0];
    assert_eq!(newest["id"], 1);
    assert_eq!(newest["user"], json!({"name": "Ada", "email": "ada@example.com"}));
    assert_eq!(newest["status"], "Delivered");
    assert_eq!(newest["items"][0]["quantity"], 1);
    assert!(newest["createdAt"].as_str().unwrap().starts_with("2026-10-19T11:00:00"));
    assert_eq!(orders[1]["id"], 2);
}

#[tokio::test]
async fn test_orders_missing_user_is_null() {
    let app = TestApp::new(seeded_store());

    let (_, body) = app
        .get_json("/api/analytics/orders?status=Delivered", Some("admin"))
        .await;

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1]["id"], 4);
    assert!(orders[1]["user"].is_null());
    assert_eq!(body["pagination"]["totalOrders"], 2);
}

#[tokio::test]
async fn test_orders_unknown_status_matches_nothing() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app
        .get_json("/api/analytics/orders?status=Shipped", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({"currentPage": 1, "totalPages": 0, "totalOrders": 0, "limit": 10})
    );
}

#[tokio::test]
async fn test_orders_malformed_paging_is_coerced() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app
        .get_json("/api/analytics/orders?page=abc&limit=0", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["limit"], 1);
    assert_eq!(body["pagination"]["totalPages"], 4);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeated_query_keys_keep_first_value() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app
        .get_json("/api/analytics/orders?status=Placed&status=all", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalOrders"], 1);
    assert_eq!(body["orders"][0]["status"], "Placed");

    let (status, body) = app
        .get_json(
            "/api/analytics/summary?dateRange=today&dateRange=all",
            Some("admin"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["totalOrders"], 3);
}

#[tokio::test]
async fn test_non_positive_page_is_echoed_as_first_page() {
    let app = TestApp::new(seeded_store());

    let (status, body) = app
        .get_json("/api/analytics/orders?page=0&limit=2", Some("admin"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["orders"][0]["id"], 1);
}

// =============================================================================
// Failures and Health
// =============================================================================

#[tokio::test]
async fn test_store_failure_renders_500() {
    let app = TestApp::new(MemoryOrderStore::new().failing("connection refused"));

    let (status, body) = app.get_json("/api/analytics/summary", Some("admin")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "message": "Failed to fetch order summary",
            "error": "store unavailable: connection refused"
        })
    );

    let (status, body) = app.get_json("/api/analytics/orders", Some("admin")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to fetch orders");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new(MemoryOrderStore::new());
    let (status, body) = app.get_raw("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, _) = app.get_raw("/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    let down = TestApp::new(MemoryOrderStore::new().failing("down"));
    let (status, _) = down.get_raw("/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
