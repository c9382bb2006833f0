//! Notification settings service.
//!
//! Keeps the notification channel preferences of every user known to the
//! identity provider. A channel is activated only with a verification code
//! sent to its address, and deactivated with a reason.

#![forbid(unsafe_code)]

pub use user_settings_types::auth;
pub use user_settings_types::error;
pub use user_settings_types::settings_adapter;
pub use user_settings_types::types;
pub use user_settings_types::verification;

pub use user_settings_channel as channel;
pub use user_settings_core::token;

pub mod app;
pub mod prelude;
pub mod routes;

pub use app::AppBuilder;

// vim: ts=4
