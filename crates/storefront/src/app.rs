//! Router assembly.
//!
//! Kept separate from `main` so integration tests drive the exact stack the
//! binary serves (minus the Sentry layers, which `main` adds on top).

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::Span;

use crate::middleware::{auth_rate_limiter, request_id_middleware, session_gate_middleware};
use crate::routes;
use crate::state::AppState;

/// Build the full storefront router.
///
/// The edge gate wraps every route including the static fallback, so page
/// navigations are classified before any file is served.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health))
        .nest(
            "/api/auth",
            routes::auth_api_routes().layer(auth_rate_limiter()),
        );

    let router = match &state.config().static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(not_found),
    };

    router
        .layer(from_fn_with_state(state.clone(), session_gate_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .with_state(state)
}

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = tracing::field::Empty,
    )
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
