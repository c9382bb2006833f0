//! App state type

use std::sync::Arc;
use std::time::Duration;

use crate::extensions::Extensions;
use crate::prelude::*;
use crate::token::{TokenDecoder, TokenValidation};

use user_settings_types::settings_adapter::SettingsAdapter;
use user_settings_types::verification::ChannelVerifier;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub token_decoder: TokenDecoder,

	pub settings_adapter: Arc<dyn SettingsAdapter>,
	pub verifier: Arc<dyn ChannelVerifier>,

	// Type-erased extension map for feature-specific state
	pub extensions: Extensions,
}

impl AppState {
	/// Get a registered extension by type. Returns error if not found.
	pub fn ext<T: Send + Sync + 'static>(&self) -> AppResult<&T> {
		self.extensions.get::<T>().ok_or_else(|| {
			Error::Internal(format!("Extension {} not registered", std::any::type_name::<T>()))
		})
	}
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub token_validation: TokenValidation,
	/// Lifetime of a verification code
	pub verification_ttl: Duration,
	/// Maximum number of pending verification codes kept in memory
	pub verification_capacity: usize,
	/// Endpoint receiving verification codes for delivery; `None` only logs them
	pub notification_url: Option<Box<str>>,
	/// Email domains (or domain suffixes) users may not register
	pub restricted_email_domains: Box<[Box<str>]>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		AppBuilderOpts {
			listen: "127.0.0.1:8080".into(),
			token_validation: TokenValidation::Trusted,
			verification_ttl: Duration::from_secs(300),
			verification_capacity: 10_000,
			notification_url: None,
			restricted_email_domains: Box::new([]),
		}
	}
}

// vim: ts=4
