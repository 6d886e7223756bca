//! Session route handlers.
//!
//! JSON endpoints that create, rotate, expose and destroy the credential
//! pair held in the `access_token` / `refresh_token` cookies. Every handler
//! that touches one cookie touches both.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use componentry_core::AccessToken;
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;
use crate::cookies;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or phone number the code was sent to.
    pub identifier: String,
    /// One-time code.
    pub code: String,
}

impl LoginRequest {
    fn validate(self) -> Result<Self> {
        let identifier = self.identifier.trim().to_string();
        let code = self.code.trim().to_string();
        if identifier.is_empty() {
            return Err(AppError::BadRequest("identifier is required".to_string()));
        }
        if code.is_empty() {
            return Err(AppError::BadRequest("code is required".to_string()));
        }
        Ok(Self { identifier, code })
    }
}

/// Body returned when a new credential pair was stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub access_token: String,
}

impl SessionResponse {
    fn issued(access_token: &AccessToken) -> Self {
        Self {
            success: true,
            access_token: access_token.expose().to_string(),
        }
    }
}

/// Body returned by the token accessor.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
}

/// Body returned by logout.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Rotate the credential pair.
///
/// - No refresh cookie: 401, no backend call, cookies untouched.
/// - Backend success: both cookies overwritten, 200 with the new access token.
/// - Backend rejection or malformed body: both cookies cleared, 401.
/// - Backend unreachable: 500, cookies untouched so a later retry can succeed.
///
/// # Route
///
/// `POST /api/auth/refresh`
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(refresh_token) = cookies::refresh_token(&jar) else {
        return AppError::Unauthenticated.into_response();
    };

    match state.backend().refresh(&refresh_token).await {
        Ok(grant) => {
            tracing::info!(expires_at = %grant.expires_at(), "session refreshed");
            add_breadcrumb("auth", "Session refreshed", None);
            let body = SessionResponse::issued(&grant.access_token);
            (state.cookies().store(jar, &grant), Json(body)).into_response()
        }
        Err(err @ BackendError::Transport(_)) => {
            tracing::warn!(error = %err, "refresh failed in transit, keeping session");
            AppError::from_refresh(err).into_response()
        }
        Err(err) => {
            tracing::info!(error = %err, "refresh rejected, clearing session");
            add_breadcrumb("auth", "Session refresh rejected", None);
            (
                state.cookies().clear(jar),
                AppError::from_refresh(err),
            )
                .into_response()
        }
    }
}

/// Expose the access token to client code that cannot read `HttpOnly` cookies.
///
/// Read-only: never writes cookies and never calls the backend.
///
/// # Route
///
/// `GET /api/auth/token`
pub async fn token(jar: CookieJar) -> (StatusCode, Json<TokenResponse>) {
    match cookies::access_token(&jar) {
        Some(token) => (
            StatusCode::OK,
            Json(TokenResponse {
                token: Some(token.into_inner()),
            }),
        ),
        None => (StatusCode::UNAUTHORIZED, Json(TokenResponse { token: None })),
    }
}

/// Exchange a one-time code for the initial credential pair.
///
/// Rejections leave any existing cookies as they were.
///
/// # Route
///
/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let request = match payload
        .map_err(|e| AppError::BadRequest(e.body_text()))
        .and_then(|Json(body)| body.validate())
    {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    match state
        .backend()
        .verify_otp(&request.identifier, &request.code)
        .await
    {
        Ok(grant) => {
            tracing::info!(expires_at = %grant.expires_at(), "session created");
            add_breadcrumb("auth", "Logged in", None);
            let body = SessionResponse::issued(&grant.access_token);
            (state.cookies().store(jar, &grant), Json(body)).into_response()
        }
        Err(err) => {
            tracing::info!(error = %err, "login failed");
            AppError::from_login(err).into_response()
        }
    }
}

/// Destroy the credential pair.
///
/// Always clears both cookies. When both credentials are present the backend
/// is asked to revoke them; that call is best-effort.
///
/// # Route
///
/// `POST /api/auth/logout`
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let (Some(access), Some(refresh)) = (cookies::access_token(&jar), cookies::refresh_token(&jar))
        && let Err(err) = state.backend().logout(&access, &refresh).await
    {
        tracing::warn!(error = %err, "backend logout failed, clearing cookies anyway");
    }

    add_breadcrumb("auth", "Logged out", None);
    (
        state.cookies().clear(jar),
        Json(LogoutResponse { success: true }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(identifier: &str, code: &str) -> LoginRequest {
        LoginRequest {
            identifier: identifier.to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_login_request_trims() {
        let req = request("  dev@example.com ", " 123456 ").validate().unwrap();
        assert_eq!(req.identifier, "dev@example.com");
        assert_eq!(req.code, "123456");
    }

    #[test]
    fn test_login_request_requires_fields() {
        assert!(matches!(
            request("", "123456").validate(),
            Err(AppError::BadRequest(m)) if m.contains("identifier")
        ));
        assert!(matches!(
            request("dev@example.com", "   ").validate(),
            Err(AppError::BadRequest(m)) if m.contains("code")
        ));
    }

    #[tokio::test]
    async fn token_without_cookie_is_unauthorized() {
        let (status, Json(body)) = token(CookieJar::new()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.token.is_none());
    }

    #[test]
    fn test_token_response_serializes_null() {
        let json = serde_json::to_string(&TokenResponse { token: None }).unwrap();
        assert_eq!(json, r#"{"token":null}"#);
    }
}
