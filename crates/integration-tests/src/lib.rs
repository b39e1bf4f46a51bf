//! Integration tests for Tally.
//!
//! The analytics router is assembled in-process over a
//! [`MemoryOrderStore`] and an in-memory session store, then driven with
//! `tower::ServiceExt::oneshot`. No database or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tally-integration-tests
//! ```
//!
//! # Sessions
//!
//! Logging in is the login service's job, so tests stand in for it: a
//! request carrying [`TEST_ROLE_HEADER`] gets a [`CurrentUser`] with that
//! role written into its session before the analytics guard runs.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use tally_admin::db::{MemoryOrderStore, OrderStore};
use tally_admin::models::{CurrentUser, Order, OrderItem, User, session_keys};
use tally_admin::routes;
use tally_admin::services::AnalyticsReporter;
use tally_admin::state::AppState;
use tally_core::{OrderId, OrderStatus, UserId, UserRole};

/// Header naming the role to log the request in as (`admin` or `customer`).
pub const TEST_ROLE_HEADER: &str = "x-test-role";

/// Fixed "now" for every test: 2026-10-19 12:00 UTC.
///
/// # Panics
///
/// Never; the timestamp is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

/// A customer user.
#[must_use]
pub fn user(id: i32, name: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: UserRole::Customer,
    }
}

/// An order placed `age_hours` before [`now`].
#[must_use]
pub fn order(
    id: i32,
    user_id: Option<i32>,
    total: Decimal,
    status: OrderStatus,
    age_hours: i64,
) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: user_id.map(UserId::new),
        items: vec![OrderItem {
            name: "Flat White".to_string(),
            quantity: 1,
            price: total,
        }],
        total,
        status,
        created_at: now() - TimeDelta::hours(age_hours),
    }
}

/// Stand-in for the login service: writes a [`CurrentUser`] into the session
/// when the request carries [`TEST_ROLE_HEADER`].
async fn test_login(session: Session, request: Request, next: Next) -> Response {
    let role = request
        .headers()
        .get(TEST_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<UserRole>().ok());

    if let Some(role) = role {
        let caller = CurrentUser {
            id: UserId::new(999),
            name: "Test Caller".to_string(),
            email: "caller@example.com".to_string(),
            role,
        };
        if let Err(e) = session.insert(session_keys::CURRENT_USER, caller).await {
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    }

    next.run(request).await
}

/// Test application over an in-memory order store.
pub struct TestApp {
    /// The store behind the router, kept to inspect query counts.
    pub store: Arc<MemoryOrderStore>,
    router: Router,
}

impl TestApp {
    /// Build the full router over `store`, reporting in UTC at [`now`].
    ///
    /// # Panics
    ///
    /// Never; the zero offset is valid.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn new(store: MemoryOrderStore) -> Self {
        Self::with_offset(store, FixedOffset::east_opt(0).unwrap())
    }

    /// Build the full router with a specific reporting offset.
    #[must_use]
    pub fn with_offset(store: MemoryOrderStore, offset: FixedOffset) -> Self {
        let store = Arc::new(store);
        let dyn_store: Arc<dyn OrderStore> = store.clone();
        let reporter = AnalyticsReporter::new(Arc::clone(&dyn_store), offset).with_clock(now);
        let state = AppState::with_reporter(dyn_store, reporter);

        let router = routes::routes()
            .layer(middleware::from_fn(test_login))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(state);

        Self { store, router }
    }

    /// Send a GET, optionally logged in with `role`, and return the status
    /// and raw body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::unwrap_used)]
    pub async fn get_raw(&self, uri: &str, role: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(role) = role {
            builder = builder.header(TEST_ROLE_HEADER, role);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    /// Send a GET and parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[allow(clippy::unwrap_used)]
    pub async fn get_json(&self, uri: &str, role: Option<&str>) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get_raw(uri, role).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}
