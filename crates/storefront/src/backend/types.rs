//! Wire types for the marketplace backend's auth endpoints.

use componentry_core::{AccessToken, RefreshToken, TokenGrant};
use serde::{Deserialize, Serialize};

use super::BackendError;

/// Body for `POST /auth/refresh`.
#[derive(Debug, Serialize)]
pub(super) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Body for `POST /auth/verify-otp`.
#[derive(Debug, Serialize)]
pub(super) struct VerifyOtpRequest<'a> {
    pub identifier: &'a str,
    pub code: &'a str,
}

/// Body for `POST /auth/logout`.
#[derive(Debug, Serialize)]
pub(super) struct LogoutRequest<'a> {
    pub refresh_token: &'a str,
}

/// Raw token-pair response shared by refresh and verify-otp.
///
/// Every field is optional on the wire so that a partial body is reported as
/// [`BackendError::Malformed`] rather than a decode failure.
#[derive(Debug, Deserialize)]
pub(super) struct TokenPairResponse {
    #[serde(default)]
    pub success: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenPairResponse {
    /// Validate the response and stamp it as a grant.
    pub fn into_grant(self) -> Result<TokenGrant, BackendError> {
        if !self.success {
            return Err(BackendError::Malformed(
                "response did not report success".to_string(),
            ));
        }

        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::Malformed("missing access_token".to_string()))?;
        let refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::Malformed("missing refresh_token".to_string()))?;

        Ok(TokenGrant::issued_now(
            AccessToken::new(access_token),
            RefreshToken::new(refresh_token),
            self.expires_in,
        ))
    }
}
