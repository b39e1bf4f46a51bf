//! Status and role enums.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    #[error("invalid order status: {0}")]
    OrderStatus(String),
    #[error("invalid user role: {0}")]
    UserRole(String),
}

/// Order lifecycle status.
///
/// Stored as plain text (`"Placed"`, `"Preparing"`, ...) so that analytics
/// filters can compare against whatever string the caller sends without a
/// cast failing on unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Preparing,
    Delivered,
    /// Reserved. Nothing moves an order into this state yet, and the summary
    /// report always reports zero cancellations.
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Placed,
        Self::Preparing,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The stored text form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::Preparing => "Preparing",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::OrderStatus(s.to_string()))
    }
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    /// May read the analytics endpoints.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseEnumError::UserRole(s.to_string())),
        }
    }
}
