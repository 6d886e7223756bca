//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (add unique ID to each request)
//! 4. Edge gate (cookie-presence redirects)
//! 5. Rate limiting (governor, `/api/auth` only)

pub mod gate;
pub mod rate_limit;
pub mod request_id;

pub use gate::{GateDecision, SessionGate, session_gate_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
