//! Unified error handling for the analytics service.
//!
//! Every failure leaves the service as JSON `{ "message": ..., "error"?: ... }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::AccessError;

/// Application-level error type for the analytics service.
#[derive(Debug, Error)]
pub enum AppError {
    /// A report query failed in the order store.
    #[error("{context}: {source}")]
    Report {
        /// What was being fetched, shown to the client as `message`.
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    /// Wrap a store failure with a description of the failed report.
    #[must_use]
    pub const fn report(context: &'static str, source: RepositoryError) -> Self {
        Self::Report { context, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Report { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => Self::Unauthorized(err.to_string()),
            AccessError::Forbidden => Self::Forbidden(err.to_string()),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Report { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Analytics request error"
            );
        }

        let status = self.status();
        let body = match self {
            Self::Report { context, source } => ErrorBody {
                message: context.to_string(),
                error: Some(source.to_string()),
            },
            Self::Unauthorized(message) | Self::Forbidden(message) => ErrorBody {
                message,
                error: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Unauthorized("test".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("test".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::report("x", RepositoryError::DataCorruption("bad".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_forbidden_body_is_exact() {
        let (status, body) = render(AccessError::Forbidden.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, serde_json::json!({"message": "Admin access required"}));
    }

    #[tokio::test]
    async fn test_report_error_exposes_underlying_message() {
        let err = AppError::report(
            "Failed to fetch order summary",
            RepositoryError::Unavailable("connection refused".to_string()),
        );
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to fetch order summary");
        assert_eq!(body["error"], "store unavailable: connection refused");
    }
}
