//! Session cookie reads and writes.
//!
//! The access and refresh cookies are only ever written or cleared together,
//! so the browser never holds one credential without the other.
//!
//! All cookies are `HttpOnly`, `Path=/`, `SameSite=Lax`, and `Secure` unless
//! running in local development.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use componentry_core::{
    ACCESS_TOKEN_COOKIE, AccessToken, REFRESH_TOKEN_COOKIE, REFRESH_TTL_SECS, RefreshToken,
    TokenGrant,
};
use time::Duration;

/// Writes session cookies with a fixed set of attributes.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    secure: bool,
}

impl SessionCookies {
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Overwrite both cookies from a freshly issued grant.
    #[must_use]
    pub fn store(self, jar: CookieJar, grant: &TokenGrant) -> CookieJar {
        jar.add(self.build(
            ACCESS_TOKEN_COOKIE,
            grant.access_token.expose().to_owned(),
            grant.access_ttl_secs(),
        ))
        .add(self.build(
            REFRESH_TOKEN_COOKIE,
            grant.refresh_token.expose().to_owned(),
            REFRESH_TTL_SECS,
        ))
    }

    /// Expire both cookies.
    ///
    /// Removal cookies are emitted even when the request did not carry the
    /// cookie, so a half-present pair is still cleared.
    #[must_use]
    pub fn clear(self, jar: CookieJar) -> CookieJar {
        jar.add(self.build(ACCESS_TOKEN_COOKIE, String::new(), 0))
            .add(self.build(REFRESH_TOKEN_COOKIE, String::new(), 0))
    }

    fn build(self, name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::seconds(max_age_secs))
            .build()
    }
}

/// The access token presented with the request, if any.
///
/// An empty cookie value counts as absent.
#[must_use]
pub fn access_token(jar: &CookieJar) -> Option<AccessToken> {
    non_empty(jar, ACCESS_TOKEN_COOKIE).map(AccessToken::new)
}

/// The refresh token presented with the request, if any.
#[must_use]
pub fn refresh_token(jar: &CookieJar) -> Option<RefreshToken> {
    non_empty(jar, REFRESH_TOKEN_COOKIE).map(RefreshToken::new)
}

/// Whether the request carries an access cookie.
#[must_use]
pub fn has_session(jar: &CookieJar) -> bool {
    non_empty(jar, ACCESS_TOKEN_COOKIE).is_some()
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
    use componentry_core::DEFAULT_ACCESS_TTL_SECS;

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    fn grant(expires_in: Option<i64>) -> TokenGrant {
        TokenGrant::issued_now(AccessToken::from("acc-2"), RefreshToken::from("ref-2"), expires_in)
    }

    #[test]
    fn test_reads_tokens_from_request() {
        let jar = jar_with("access_token=acc-1; refresh_token=ref-1; theme=dark");
        assert_eq!(access_token(&jar).unwrap().expose(), "acc-1");
        assert_eq!(refresh_token(&jar).unwrap().expose(), "ref-1");
        assert!(has_session(&jar));
    }

    #[test]
    fn test_empty_value_counts_as_absent() {
        let jar = jar_with("access_token=; refresh_token=");
        assert!(access_token(&jar).is_none());
        assert!(refresh_token(&jar).is_none());
        assert!(!has_session(&jar));
    }

    #[test]
    fn test_store_sets_both_with_attributes() {
        let jar = SessionCookies::new(true).store(CookieJar::new(), &grant(Some(900)));

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "acc-2");
        assert_eq!(access.max_age(), Some(Duration::seconds(900)));
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.secure(), Some(true));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.value(), "ref-2");
        assert_eq!(refresh.max_age(), Some(Duration::seconds(REFRESH_TTL_SECS)));
    }

    #[test]
    fn test_store_defaults_access_ttl() {
        let jar = SessionCookies::new(false).store(CookieJar::new(), &grant(None));
        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.max_age(), Some(Duration::seconds(DEFAULT_ACCESS_TTL_SECS)));
        assert_eq!(access.secure(), Some(false));
    }

    #[test]
    fn test_clear_expires_both() {
        let jar = SessionCookies::new(true).clear(jar_with("access_token=acc-1"));
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        }
        assert!(!has_session(&jar));
    }
}
