//! Session credential types.
//!
//! Both credentials are opaque bearer strings issued by the backend. The
//! storefront never inspects their contents; it only stores, forwards and
//! clears them.

use core::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Cookie holding the short-lived access credential.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie holding the long-lived refresh credential.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Access credential lifetime used when the backend omits `expires_in`.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;

/// Fixed refresh credential lifetime (14 days).
pub const REFRESH_TTL_SECS: i64 = 14 * 24 * 60 * 60;

/// Upper bound on the access credential lifetime. An access cookie never
/// outlives the refresh cookie stored next to it.
pub const MAX_ACCESS_TTL_SECS: i64 = REFRESH_TTL_SECS;

macro_rules! bearer_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw token string.
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns the raw token value.
            ///
            /// Only call this when writing the token to a cookie, a response
            /// body, or an outgoing backend request.
            #[must_use]
            pub fn expose(&self) -> &str {
                &self.0
            }

            /// Consumes the token and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&"[REDACTED]").finish()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

bearer_token!(
    /// Short-lived bearer token authorizing backend API calls.
    AccessToken
);

bearer_token!(
    /// Long-lived bearer token used solely to obtain a new access token.
    RefreshToken
);

/// A freshly issued credential pair.
///
/// Produced by the backend on login and on every refresh. The pair is always
/// written to (or cleared from) the cookie jar as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    /// The new access token.
    pub access_token: AccessToken,
    /// The new refresh token (the previous one is consumed).
    pub refresh_token: RefreshToken,
    /// Access token lifetime in seconds, as reported by the backend.
    pub expires_in: Option<i64>,
    /// Unix timestamp when the grant was received.
    pub obtained_at: i64,
}

impl TokenGrant {
    /// Create a grant stamped with the current time.
    #[must_use]
    pub fn issued_now(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        expires_in: Option<i64>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            obtained_at: Utc::now().timestamp(),
        }
    }

    /// Lifetime to give the access cookie, in seconds.
    ///
    /// Missing or non-positive backend values fall back to
    /// [`DEFAULT_ACCESS_TTL_SECS`]; larger values are capped at
    /// [`MAX_ACCESS_TTL_SECS`].
    #[must_use]
    pub fn access_ttl_secs(&self) -> i64 {
        self.expires_in
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_ACCESS_TTL_SECS, |secs| secs.min(MAX_ACCESS_TTL_SECS))
    }

    /// When the access token stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        let obtained = DateTime::from_timestamp(self.obtained_at, 0).unwrap_or_else(Utc::now);
        TimeDelta::try_seconds(self.access_ttl_secs())
            .and_then(|ttl| obtained.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grant(expires_in: Option<i64>) -> TokenGrant {
        TokenGrant::issued_now(AccessToken::from("acc"), RefreshToken::from("ref"), expires_in)
    }

    #[test]
    fn test_debug_redacts_token_value() {
        let token = AccessToken::from("super-secret-access");
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-access"));

        let token = RefreshToken::from("super-secret-refresh");
        assert!(!format!("{token:?}").contains("super-secret-refresh"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let token: AccessToken = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(token.expose(), "abc");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_access_ttl_uses_backend_value() {
        assert_eq!(grant(Some(900)).access_ttl_secs(), 900);
    }

    #[test]
    fn test_access_ttl_defaults_when_missing_or_invalid() {
        assert_eq!(grant(None).access_ttl_secs(), DEFAULT_ACCESS_TTL_SECS);
        assert_eq!(grant(Some(0)).access_ttl_secs(), DEFAULT_ACCESS_TTL_SECS);
        assert_eq!(grant(Some(-5)).access_ttl_secs(), DEFAULT_ACCESS_TTL_SECS);
    }

    #[test]
    fn test_refresh_ttl_is_fourteen_days() {
        assert_eq!(REFRESH_TTL_SECS, 1_209_600);
    }

    #[test]
    fn test_access_ttl_is_capped() {
        assert_eq!(grant(Some(i64::MAX)).access_ttl_secs(), MAX_ACCESS_TTL_SECS);
        assert_eq!(
            grant(Some(9_000_000_000_000_000)).access_ttl_secs(),
            MAX_ACCESS_TTL_SECS
        );
        assert_eq!(grant(Some(MAX_ACCESS_TTL_SECS)).access_ttl_secs(), MAX_ACCESS_TTL_SECS);
    }

    #[test]
    fn test_expires_at_survives_huge_backend_values() {
        let g = grant(Some(i64::MAX));
        assert_eq!(g.expires_at().timestamp(), g.obtained_at + MAX_ACCESS_TTL_SECS);
    }

    #[test]
    fn test_expires_at_saturates_on_out_of_range_timestamp() {
        let mut g = grant(Some(3600));
        g.obtained_at = DateTime::<Utc>::MAX_UTC.timestamp();
        assert_eq!(g.expires_at(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_expires_at_adds_ttl() {
        let mut g = grant(Some(100));
        g.obtained_at = 1_000;
        assert_eq!(g.expires_at().timestamp(), 1_100);
    }
}
