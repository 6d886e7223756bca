//! Componentry Storefront library.
//!
//! This crate provides the storefront session gateway as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod backend;
pub mod config;
pub mod cookies;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use state::AppState;
