//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The session endpoints under `/api/auth` each trigger a backend round trip,
//! so they are limited per client IP.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor for deployments behind a reverse proxy.
///
/// Order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then the socket
/// peer address (requires `into_make_service_with_connect_info`).
#[derive(Clone, Copy)]
pub struct ForwardedIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ForwardedIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        let peer = || {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        };

        forwarded
            .or_else(real_ip)
            .or_else(peer)
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ForwardedIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for session endpoints: ~30 requests per minute per IP.
///
/// Configuration: 1 request every 2 seconds (replenish), burst of 10. A page
/// load with several tabs refreshing at once stays well inside the burst.
///
/// # Panics
///
/// This function will not panic. `per_second(2)` and `burst_size(10)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ForwardedIpKeyExtractor)
        .per_second(2)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(2) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tower_governor::key_extractor::KeyExtractor;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/auth/refresh");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_prefers_first_forwarded_hop() {
        let req = request(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        let ip = ForwardedIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        let req = request(&[("x-forwarded-for", "garbage"), ("x-real-ip", "198.51.100.2")]);
        let ip = ForwardedIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request(&[]);
        let addr: SocketAddr = "192.0.2.10:52000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        let ip = ForwardedIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip, addr.ip());
    }

    #[test]
    fn test_errors_without_any_source() {
        let req = request(&[]);
        assert!(ForwardedIpKeyExtractor.extract(&req).is_err());
    }
}
