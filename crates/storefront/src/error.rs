//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Every error body is JSON of the
//! form `{ "success": false, "error": "<message>" }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// No credential was presented.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Backend invalidated the refresh token or sent an unusable pair.
    #[error("Refresh rejected: {0}")]
    RefreshRejected(#[source] BackendError),

    /// Backend refused the one-time code.
    #[error("Login rejected: {0}")]
    LoginRejected(#[source] BackendError),

    /// Backend could not be reached. Credentials are left untouched.
    #[error("Transport error: {0}")]
    Transport(#[source] BackendError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classify a failed refresh call.
    #[must_use]
    pub fn from_refresh(err: BackendError) -> Self {
        match err {
            BackendError::Transport(_) => Self::Transport(err),
            BackendError::Rejected(_) | BackendError::Malformed(_) => Self::RefreshRejected(err),
        }
    }

    /// Classify a failed login call.
    #[must_use]
    pub fn from_login(err: BackendError) -> Self {
        match err {
            BackendError::Transport(_) => Self::Transport(err),
            BackendError::Rejected(_) | BackendError::Malformed(_) => Self::LoginRejected(err),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::RefreshRejected(_) | Self::LoginRejected(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Transport(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Transport(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose backend or internal details to clients
        let message = match &self {
            Self::Unauthenticated => "Not authenticated".to_string(),
            Self::RefreshRejected(_) => "Session expired".to_string(),
            Self::LoginRejected(_) => "Invalid or expired code".to_string(),
            Self::Transport(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for session lifecycle events.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("auth", "Session refreshed", Some(&[("expires_in", "3600")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
