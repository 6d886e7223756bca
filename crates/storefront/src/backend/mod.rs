//! Marketplace backend REST client.
//!
//! The backend owns every credential decision: it issues, rotates and revokes
//! token pairs. This client only forwards credentials and classifies the
//! outcome so handlers can decide what to do with the cookie jar.
//!
//! # Outcome classification
//!
//! | Situation | Error |
//! |---|---|
//! | Request never got a response, or the body could not be read | [`BackendError::Transport`] |
//! | Non-2xx status | [`BackendError::Rejected`] |
//! | 2xx with an unusable body | [`BackendError::Malformed`] |
//!
//! # Example
//!
//! ```rust,ignore
//! let client = BackendClient::new(&config.backend_url);
//! let grant = client.refresh(&refresh_token).await?;
//! ```

mod types;

use std::sync::Arc;

use componentry_core::{AccessToken, RefreshToken, TokenGrant};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use types::{LogoutRequest, RefreshRequest, TokenPairResponse, VerifyOtpRequest};

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached or the response could not be read.
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend rejected request with status {0}")]
    Rejected(StatusCode),

    /// The backend answered 2xx but the body was unusable.
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Client for the marketplace backend.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The submitted refresh token is consumed by the backend whether or not
    /// the caller manages to store the new pair.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] classified as described in the module docs.
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenGrant, BackendError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.expose(),
        };
        self.post_for_grant("auth/refresh", &body).await
    }

    /// Verify a one-time code and obtain the initial token pair.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] classified as described in the module docs.
    pub async fn verify_otp(&self, identifier: &str, code: &str) -> Result<TokenGrant, BackendError> {
        let body = VerifyOtpRequest { identifier, code };
        self.post_for_grant("auth/verify-otp", &body).await
    }

    /// Ask the backend to revoke a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] or [`BackendError::Rejected`].
    pub async fn logout(
        &self,
        access_token: &AccessToken,
        refresh_token: &RefreshToken,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/logout"))
            .bearer_auth(access_token.expose())
            .json(&LogoutRequest {
                refresh_token: refresh_token.expose(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Rejected(response.status()));
        }
        Ok(())
    }

    async fn post_for_grant<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TokenGrant, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, path, "backend rejected token request");
            return Err(BackendError::Rejected(status));
        }

        // Read the bytes first so decode failures are not mistaken for transport errors
        let bytes = response.bytes().await?;
        let parsed: TokenPairResponse = serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        parsed.into_grant()
    }
}
