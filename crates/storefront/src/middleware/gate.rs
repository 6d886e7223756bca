//! Edge request gate.
//!
//! Classifies each request path against the protected and auth-only route
//! sets and redirects before any handler runs. Only the *presence* of the
//! access cookie is checked: the value is never parsed, verified, or sent
//! anywhere. An expired but present cookie passes the gate and fails later
//! against the backend. This is a perimeter check for navigation, not an
//! authorization boundary.

use std::borrow::Cow;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use componentry_core::RoutePrefix;

use crate::config::GateConfig;
use crate::cookies;
use crate::state::AppState;

/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through unmodified.
    PassThrough,
    /// Signed-out visitor on a protected route.
    RedirectToLogin,
    /// Signed-in visitor on an auth-only route.
    RedirectToLanding,
}

/// Route classification for the edge gate.
#[derive(Debug, Clone)]
pub struct SessionGate {
    protected: Vec<RoutePrefix>,
    auth_only: Vec<RoutePrefix>,
    login_path: String,
    landing_path: String,
}

impl SessionGate {
    #[must_use]
    pub fn new(config: &GateConfig) -> Self {
        Self {
            protected: config.protected.clone(),
            auth_only: config.auth_only.clone(),
            login_path: config.login_path.clone(),
            landing_path: config.landing_path.clone(),
        }
    }

    /// Decide what to do with a request for `path`.
    ///
    /// The path is first resolved the way the static file server resolves
    /// it, so encoded or doubled separators cannot reach a protected file.
    /// Protected routes are checked before auth-only routes. A redirect whose
    /// target is the requested path itself is downgraded to a pass-through so
    /// a misconfigured route set cannot loop.
    #[must_use]
    pub fn decide(&self, path: &str, has_session: bool) -> GateDecision {
        let path = canonical_path(path);
        let path = path.as_str();

        let decision = if !has_session && self.protected.iter().any(|p| p.matches(path)) {
            GateDecision::RedirectToLogin
        } else if has_session && self.auth_only.iter().any(|p| p.matches(path)) {
            GateDecision::RedirectToLanding
        } else {
            GateDecision::PassThrough
        };

        match self.target(decision) {
            Some(target) if same_path(target, path) => GateDecision::PassThrough,
            _ => decision,
        }
    }

    /// Redirect location for a decision.
    #[must_use]
    pub fn target(&self, decision: GateDecision) -> Option<&str> {
        match decision {
            GateDecision::PassThrough => None,
            GateDecision::RedirectToLogin => Some(&self.login_path),
            GateDecision::RedirectToLanding => Some(&self.landing_path),
        }
    }
}

/// Percent-decode `raw` and drop empty and `.` segments.
///
/// Undecodable paths are kept as-is; the file server refuses them anyway.
fn canonical_path(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    let segments: Vec<&str> = decoded
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    format!("/{}", segments.join("/"))
}

fn same_path(target: &str, path: &str) -> bool {
    fn trim(s: &str) -> &str {
        let t = s.trim_end_matches('/');
        if t.is_empty() { "/" } else { t }
    }

    let target = target.split(['?', '#']).next().unwrap_or(target);
    trim(target) == trim(path)
}

/// Middleware applying [`SessionGate`] to every request.
///
/// Redirects are `307 Temporary Redirect` with an empty body.
pub async fn session_gate_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let gate = state.gate();
    let path = request.uri().path();
    let decision = gate.decide(path, cookies::has_session(&jar));

    match gate.target(decision) {
        Some(target) => {
            tracing::debug!(path, target, ?decision, "edge gate redirect");
            Redirect::temporary(target).into_response()
        }
        None => next.run(request).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gate() -> SessionGate {
        SessionGate::new(&GateConfig::default())
    }

    #[test]
    fn test_protected_without_session_redirects_to_login() {
        let gate = gate();
        for path in ["/profile", "/profile/", "/profile/orders", "/complete-profile"] {
            assert_eq!(gate.decide(path, false), GateDecision::RedirectToLogin, "{path}");
        }
        assert_eq!(gate.target(GateDecision::RedirectToLogin), Some("/login"));
    }

    #[test]
    fn test_protected_with_session_passes() {
        let gate = gate();
        assert_eq!(gate.decide("/profile", true), GateDecision::PassThrough);
        assert_eq!(gate.decide("/complete-profile", true), GateDecision::PassThrough);
    }

    #[test]
    fn test_auth_only_with_session_redirects_to_landing() {
        let gate = gate();
        assert_eq!(gate.decide("/login", true), GateDecision::RedirectToLanding);
        assert_eq!(gate.target(GateDecision::RedirectToLanding), Some("/"));
    }

    #[test]
    fn test_auth_only_without_session_passes() {
        assert_eq!(gate().decide("/login", false), GateDecision::PassThrough);
    }

    #[test]
    fn test_unrelated_paths_pass() {
        let gate = gate();
        for has_session in [true, false] {
            assert_eq!(gate.decide("/", has_session), GateDecision::PassThrough);
            assert_eq!(gate.decide("/components/button", has_session), GateDecision::PassThrough);
            assert_eq!(gate.decide("/profiles", has_session), GateDecision::PassThrough);
            assert_eq!(gate.decide("/api/auth/token", has_session), GateDecision::PassThrough);
        }
    }

    #[test]
    fn test_self_redirect_is_suppressed() {
        let config = GateConfig {
            protected: RoutePrefix::parse_list("/").unwrap(),
            ..GateConfig::default()
        };
        let gate = SessionGate::new(&config);
        assert_eq!(gate.decide("/login", false), GateDecision::PassThrough);
        assert_eq!(gate.decide("/cart", false), GateDecision::RedirectToLogin);
    }

    #[test]
    fn test_canonical_path_matches_file_server_resolution() {
        assert_eq!(canonical_path("/profile"), "/profile");
        assert_eq!(canonical_path("/%70rofile/"), "/profile");
        assert_eq!(canonical_path("//profile/"), "/profile");
        assert_eq!(canonical_path("/profile%2F/"), "/profile");
        assert_eq!(canonical_path("/./profile/./orders"), "/profile/orders");
        assert_eq!(canonical_path("/"), "/");
        assert_eq!(canonical_path(""), "/");
    }

    #[test]
    fn test_encoded_protected_paths_redirect_to_login() {
        let gate = gate();
        for path in ["/%70rofile/", "//profile/", "/profile%2F/", "/./profile", "/profile%2Forders"] {
            assert_eq!(gate.decide(path, false), GateDecision::RedirectToLogin, "{path}");
        }
        assert_eq!(gate.decide("/%6Cogin", true), GateDecision::RedirectToLanding);
    }

    #[test]
    fn test_same_path_ignores_query_and_trailing_slash() {
        assert!(same_path("/login?next=/profile", "/login/"));
        assert!(same_path("/", "/"));
        assert!(!same_path("/login", "/logout"));
    }
}
