//! Integration tests for the Componentry storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p componentry-integration-tests
//! ```
//!
//! Each test builds the real router with [`componentry_storefront::build_router`]
//! and drives it in process with `tower::ServiceExt::oneshot`. The marketplace
//! backend is a `wiremock` server, so backend call counts can be asserted with
//! `Mock::expect`.
//!
//! # Test Categories
//!
//! - `edge_gate` - Redirect behavior for protected and auth-only routes
//! - `session_api` - Refresh, token accessor, login and logout endpoints
//! - `rate_limit` - Per-client-IP limiter on the session API

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{
        Request, Response,
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
};
use axum_extra::extract::cookie::Cookie;
use componentry_storefront::{AppState, build_router, config::StorefrontConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

/// Client IP attached to every request so the rate limiter can key on it.
const TEST_CLIENT_IP: &str = "203.0.113.7";

/// The storefront router wired to a stub backend.
pub struct TestApp {
    backend: MockServer,
    router: Router,
}

impl TestApp {
    /// Start a stub backend and build the storefront with default settings.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a stub backend and build the storefront, adjusting the config first.
    pub async fn start_with(configure: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let backend = MockServer::start().await;
        let backend_url = Url::parse(&backend.uri()).expect("mock server uri is a valid URL");
        let mut config = StorefrontConfig::for_backend(backend_url);
        configure(&mut config);
        let router = build_router(AppState::new(config));
        Self { backend, router }
    }

    /// The stub backend, for mounting mocks.
    #[must_use]
    pub const fn backend(&self) -> &MockServer {
        &self.backend
    }

    /// Send a GET request with an optional `Cookie` header.
    pub async fn get(&self, path: &str, cookies: Option<&str>) -> Response<Body> {
        self.send(request("GET", path, cookies, None)).await
    }

    /// Send a POST request with an optional `Cookie` header and JSON body.
    pub async fn post(&self, path: &str, cookies: Option<&str>, body: Option<&Value>) -> Response<Body> {
        self.send(request("POST", path, cookies, body)).await
    }

    /// Send an arbitrary request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

/// Build a request carrying the test client IP.
#[must_use]
pub fn request(method: &str, path: &str, cookies: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("x-forwarded-for", TEST_CLIENT_IP);

    if let Some(cookies) = cookies {
        builder = builder.header(COOKIE, cookies);
    }

    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).expect("request parts are valid")
}

/// Parse every `Set-Cookie` header on a response, keyed by cookie name.
#[must_use]
pub fn set_cookies(response: &Response<Body>) -> HashMap<String, Cookie<'static>> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| {
            let raw = value.to_str().expect("set-cookie header is ascii").to_owned();
            let cookie = Cookie::parse(raw).expect("set-cookie header parses");
            (cookie.name().to_owned(), cookie)
        })
        .collect()
}

/// Collect a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Base URL of a port nothing listens on.
#[must_use]
pub fn unreachable_backend() -> Url {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("can bind an ephemeral port")
        .port();
    Url::parse(&format!("http://127.0.0.1:{port}")).expect("valid URL")
}
