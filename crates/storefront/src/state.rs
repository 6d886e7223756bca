//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::StorefrontConfig;
use crate::cookies::SessionCookies;
use crate::middleware::SessionGate;

/// Application state shared across all handlers.
///
/// Everything in here is immutable after startup. Handlers receive it through
/// axum's `State` extractor instead of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    gate: SessionGate,
    cookies: SessionCookies,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(&config.backend_url);
        let gate = SessionGate::new(&config.gate);
        let cookies = SessionCookies::new(config.cookie_secure());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                gate,
                cookies,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the edge gate.
    #[must_use]
    pub fn gate(&self) -> &SessionGate {
        &self.inner.gate
    }

    /// Get the session cookie writer.
    #[must_use]
    pub fn cookies(&self) -> SessionCookies {
        self.inner.cookies
    }
}
