//! Notification channel subsystem
//!
//! # Endpoints
//!
//! - `GET /me` - settings of the caller, created on first access
//! - `GET /{keycloakId}` - settings of another user (officers)
//! - `POST /me/channels/{channel}/verify` - send a verification code
//! - `POST /me/channels/{channel}/activate` - activate with a verification code
//! - `POST /me/channels/{channel}/deactivate` - deactivate with a reason
//! - `POST /me/channels/email/validate` - check an email address
//!
//! Only citizens may manage the `diia` channel.

#![forbid(unsafe_code)]

pub mod handler;
pub mod service;
pub mod types;
pub mod validate;

mod prelude;

use crate::prelude::*;
use user_settings_core::AppBuilderOpts;
use user_settings_core::extensions::Extensions;

/// Registers the channel subsystem's shared state
pub fn register_extensions(extensions: &mut Extensions, opts: &AppBuilderOpts) -> AppResult<()> {
	let validator = validate::AddressValidator::new(&opts.restricted_email_domains[..])?;
	extensions.register(validator)
}

// vim: ts=4
