//! Core types for Componentry.
//!
//! This module provides type-safe wrappers for the session credentials and
//! the path prefixes the edge gate classifies requests against.

pub mod route;
pub mod token;

pub use route::{RoutePrefix, RoutePrefixError};
pub use token::{
    ACCESS_TOKEN_COOKIE, AccessToken, DEFAULT_ACCESS_TTL_SECS, MAX_ACCESS_TTL_SECS,
    REFRESH_TOKEN_COOKIE, REFRESH_TTL_SECS, RefreshToken, TokenGrant,
};
