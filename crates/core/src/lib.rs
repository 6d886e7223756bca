//! Componentry Core - Shared types library.
//!
//! This crate provides the types shared by the Componentry storefront and its
//! integration tests:
//! - `storefront` - Session gateway in front of the component marketplace backend
//! - `integration-tests` - In-process router tests against a stubbed backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no cookie parsing. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Credential newtypes, token grants, and route prefixes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
