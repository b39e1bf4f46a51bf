//! Session-related types for caller identity.
//!
//! The login service writes these into the shared session store; this
//! service only reads them.

use serde::{Deserialize, Serialize};

use tally_core::{UserId, UserRole};

/// Session-stored caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: String,
    /// User's role.
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether the caller may read analytics.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
