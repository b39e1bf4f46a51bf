//! Order and user domain types.
//!
//! Orders are owned by the storefront; this service only ever reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{OrderId, OrderStatus, UserId, UserRole};

/// A line item as stored in the `orders.items` JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product name at the time of purchase.
    pub name: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// An order (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    /// Customer who placed the order. `None` once the account is deleted.
    pub user_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A user account (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// The customer fields exposed in order listings.
///
/// Only name and email leave the service; role and IDs stay internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
}

impl From<&User> for OrderCustomer {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// An order as returned by the listing endpoint, with its customer resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListing {
    pub id: OrderId,
    /// `null` when the order's user no longer exists.
    pub user: Option<OrderCustomer>,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
