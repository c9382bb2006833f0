//! Shared types, adapter traits, and error types for the settings service.
//!
//! The server crates and the storage adapters both depend on this crate, so
//! adapters never need to link the HTTP feature modules.

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod prelude;
pub mod settings_adapter;
pub mod types;
pub mod verification;

// vim: ts=4
