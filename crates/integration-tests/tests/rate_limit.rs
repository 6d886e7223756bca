//! Integration tests for the per-IP limiter on the session API.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, StatusCode};
use componentry_integration_tests::{TestApp, request};
use wiremock::{Mock, ResponseTemplate, matchers::any};

/// Burst allowed before the limiter starts refusing.
const BURST: usize = 10;

fn token_request_from(ip: &str) -> axum::http::Request<axum::body::Body> {
    let mut req = request("GET", "/api/auth/token", None, None);
    req.headers_mut().insert(
        "x-forwarded-for",
        HeaderValue::from_str(ip).expect("valid header value"),
    );
    req
}

#[tokio::test]
async fn test_burst_exhaustion_returns_too_many_requests() {
    let app = TestApp::start().await;

    for attempt in 0..BURST {
        let resp = app.send(token_request_from("198.51.100.20")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "attempt {attempt}");
    }

    let resp = app.send(token_request_from("198.51.100.20")).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_limit_is_per_client_ip() {
    let app = TestApp::start().await;

    for _ in 0..=BURST {
        app.send(token_request_from("198.51.100.20")).await;
    }
    let resp = app.send(token_request_from("198.51.100.20")).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let resp = app.send(token_request_from("198.51.100.21")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pages_and_health_are_not_limited() {
    let app = TestApp::start().await;

    for _ in 0..=BURST {
        app.send(token_request_from("198.51.100.20")).await;
    }

    let resp = app.get("/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.get("/profile", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_peer_address_is_used_without_proxy_headers() {
    let app = TestApp::start().await;

    let mut req = request("GET", "/api/auth/token", None, None);
    req.headers_mut().remove("x-forwarded-for");
    req.extensions_mut()
        .insert(ConnectInfo("192.0.2.10:52000".parse::<SocketAddr>().expect("valid addr")));

    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unkeyable_request_is_refused_before_backend() {
    let app = TestApp::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(app.backend())
        .await;

    let mut req = request("POST", "/api/auth/refresh", Some("refresh_token=r"), None);
    req.headers_mut().remove("x-forwarded-for");

    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
