//! App builder - constructs and runs the settings service

use std::{sync::Arc, time::Duration};

use crate::prelude::*;
use crate::routes;
pub use user_settings_core::app::{App, AppBuilderOpts, AppState, VERSION};
use user_settings_core::extensions::Extensions;
use user_settings_core::token::{TokenDecoder, TokenValidation};
use user_settings_core::verification::{
	CodeDelivery, HttpCodeDelivery, LogCodeDelivery, OtpVerifier,
};
use user_settings_types::settings_adapter::SettingsAdapter;
use user_settings_types::verification::ChannelVerifier;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	settings_adapter: Option<Arc<dyn SettingsAdapter>>,
	verifier: Option<Arc<dyn ChannelVerifier>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// try_init: several builders may share a process (tests)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default(), settings_adapter: None, verifier: None }
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn token_validation(&mut self, token_validation: TokenValidation) -> &mut Self {
		self.opts.token_validation = token_validation;
		self
	}
	pub fn verification_ttl(&mut self, ttl: Duration) -> &mut Self {
		self.opts.verification_ttl = ttl;
		self
	}
	pub fn verification_capacity(&mut self, capacity: usize) -> &mut Self {
		self.opts.verification_capacity = capacity;
		self
	}
	pub fn notification_url(&mut self, url: impl Into<Box<str>>) -> &mut Self {
		self.opts.notification_url = Some(url.into());
		self
	}
	pub fn restricted_email_domains(
		&mut self,
		domains: impl IntoIterator<Item = impl Into<Box<str>>>,
	) -> &mut Self {
		self.opts.restricted_email_domains = domains.into_iter().map(Into::into).collect();
		self
	}

	// Adapters
	pub fn settings_adapter(&mut self, settings_adapter: Arc<dyn SettingsAdapter>) -> &mut Self {
		self.settings_adapter = Some(settings_adapter);
		self
	}
	/// Replaces the built-in one-time code verifier
	pub fn verifier(&mut self, verifier: Arc<dyn ChannelVerifier>) -> &mut Self {
		self.verifier = Some(verifier);
		self
	}

	/// Assembles the app state without binding a listener
	pub fn build(self) -> AppResult<App> {
		let Some(settings_adapter) = self.settings_adapter else {
			error!("FATAL: No settings adapter configured");
			return Err(Error::Internal("No settings adapter configured".to_string()));
		};

		let token_decoder = TokenDecoder::new(&self.opts.token_validation).inspect_err(|e| {
			error!("FATAL: Invalid token validation configuration: {}", e);
		})?;

		let verifier = match self.verifier {
			Some(verifier) => verifier,
			None => {
				let delivery: Arc<dyn CodeDelivery> = match &self.opts.notification_url {
					Some(url) => {
						info!("Verification codes are delivered to {}", url);
						Arc::new(HttpCodeDelivery::new(url)?)
					}
					None => {
						warn!("No notification URL configured, verification codes are only logged");
						Arc::new(LogCodeDelivery)
					}
				};
				Arc::new(OtpVerifier::new(
					self.opts.verification_ttl,
					self.opts.verification_capacity,
					delivery,
				))
			}
		};

		// Build extensions map for feature-specific state
		let mut extensions = Extensions::new();
		user_settings_channel::register_extensions(&mut extensions, &self.opts)?;
		info!("Extensions: {}", extensions.names().collect::<Vec<_>>().join(", "));

		Ok(Arc::new(AppState {
			opts: self.opts,
			token_decoder,
			settings_adapter,
			verifier,
			extensions,
		}))
	}

	pub async fn run(self) -> AppResult<()> {
		info!("User settings service V{}", VERSION);

		rustls::crypto::CryptoProvider::install_default(
			rustls::crypto::aws_lc_rs::default_provider(),
		)
		.map_err(|e| {
			error!("FATAL: Failed to install default crypto provider: {:?}", e);
			Error::Internal("Failed to install default crypto provider".to_string())
		})?;

		let app = self.build()?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|e| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
			Error::Io(e)
		})?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
