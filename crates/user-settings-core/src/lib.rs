//! Core infrastructure for the settings service.
//!
//! Shared by the feature crates and the application crate: app state,
//! access token authentication, request extractors, role rules and the
//! one-time code verifier.

#![forbid(unsafe_code)]

pub mod app;
pub mod extensions;
pub mod extract;
pub mod middleware;
pub mod prelude;
pub mod roles;
pub mod route_auth;
pub mod token;
pub mod verification;

pub use app::{App, AppBuilderOpts, AppState};
pub use extract::Auth;
pub use token::{TokenDecoder, TokenValidation};

// vim: ts=4
