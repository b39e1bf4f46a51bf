//! HTTP middleware for the analytics service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Admin guard (`route_layer` on the analytics routes only)

pub mod auth;
pub mod session;

pub use auth::{AccessError, authorize, require_admin};
pub use session::create_session_layer;
