//! Admin access guard.
//!
//! Every analytics route sits behind [`require_admin`], applied once with
//! `Router::route_layer`. The guard resolves the caller from the session,
//! checks the role, and only then lets the handler run, so a rejected
//! request never reaches the order store.

use axum::{extract::Request, middleware::Next, response::Response};
use thiserror::Error;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Why a caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No logged-in user in the session.
    #[error("Not authenticated")]
    Unauthenticated,
    /// Logged in, but not an admin.
    #[error("Admin access required")]
    Forbidden,
}

/// Check that a resolved caller may read analytics.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` when there is no caller and
/// `AccessError::Forbidden` when the caller's role is not admin.
pub fn authorize(caller: Option<CurrentUser>) -> Result<CurrentUser, AccessError> {
    let caller = caller.ok_or(AccessError::Unauthenticated)?;
    if !caller.is_admin() {
        return Err(AccessError::Forbidden);
    }
    Ok(caller)
}

/// Middleware requiring an admin caller.
///
/// On success the authorized [`CurrentUser`] is inserted into the request
/// extensions for handlers to pick up with `Extension<CurrentUser>`.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` (401) or `AppError::Forbidden` (403).
pub async fn require_admin(mut request: Request, next: Next) -> Result<Response, AppError> {
    // Clone the handle so no borrow of the request is held across the await.
    let session = request.extensions().get::<Session>().cloned();

    let caller = match session {
        Some(session) => session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten(),
        None => None,
    };

    let admin = authorize(caller).inspect_err(|e| {
        tracing::warn!(path = %request.uri().path(), reason = %e, "analytics access denied");
    })?;

    tracing::Span::current().record("admin_user_id", admin.id.as_i32());
    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}
