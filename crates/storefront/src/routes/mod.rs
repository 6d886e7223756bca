//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Session API
//! POST /api/auth/login         - Exchange a one-time code for a session
//! POST /api/auth/refresh       - Rotate the access/refresh cookie pair
//! GET  /api/auth/token         - Expose the access token to client code
//! POST /api/auth/logout        - Clear the session
//!
//! # Everything else
//! *                            - Prebuilt frontend bundle (when configured), else 404
//! ```

pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the session API router.
pub fn auth_api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/token", get(auth::token))
        .route("/logout", post(auth::logout))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
pub async fn health() -> &'static str {
    "ok"
}
