//! One-time code verification of channel addresses
//!
//! A code is bound to a (user, channel) pair and to the address it was sent
//! to. Sending a new code replaces the pending one. Codes expire after the
//! configured TTL and are consumed by a successful check.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use lru::LruCache;
use rand::RngExt;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::prelude::*;
use user_settings_types::verification::ChannelVerifier;

pub const CODE_LENGTH: usize = 6;
/// Wrong guesses allowed before a pending code is dropped
pub const MAX_ATTEMPTS: u32 = 5;

/// Verification message handed to the delivery backend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMessage<'a> {
	pub channel: Channel,
	pub keycloak_id: KeycloakId,
	pub address: &'a str,
	pub code: &'a str,
}

/// Delivers a verification code to the user out-of-band
#[async_trait]
pub trait CodeDelivery: Send + Sync {
	async fn deliver(&self, message: &VerificationMessage<'_>) -> AppResult<()>;
}

// LogCodeDelivery //
//*****************//
/// Writes codes to the log instead of sending them (development setups)
#[derive(Debug, Default)]
pub struct LogCodeDelivery;

#[async_trait]
impl CodeDelivery for LogCodeDelivery {
	async fn deliver(&self, message: &VerificationMessage<'_>) -> AppResult<()> {
		info!(
			channel = %message.channel,
			keycloak_id = %message.keycloak_id,
			"Verification code for {}: {}",
			message.address,
			message.code
		);
		Ok(())
	}
}

// HttpCodeDelivery //
//******************//
/// Posts the verification message as JSON to a notification service
pub struct HttpCodeDelivery {
	uri: hyper::Uri,
	client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HttpCodeDelivery {
	pub fn new(url: &str) -> AppResult<Self> {
		let uri = url
			.parse::<hyper::Uri>()
			.map_err(|e| Error::ConfigError(format!("Invalid notification URL '{}': {}", url, e)))?;

		let connector = HttpsConnectorBuilder::new()
			.with_native_roots()
			.map_err(|e| Error::ConfigError(format!("TLS error: {}", e)))?
			.https_or_http()
			.enable_http1()
			.build();
		let client = Client::builder(TokioExecutor::new()).build(connector);

		Ok(Self { uri, client })
	}
}

#[async_trait]
impl CodeDelivery for HttpCodeDelivery {
	async fn deliver(&self, message: &VerificationMessage<'_>) -> AppResult<()> {
		let body = serde_json::to_vec(message)?;
		let request = hyper::Request::builder()
			.method(hyper::Method::POST)
			.uri(self.uri.clone())
			.header("Content-Type", "application/json")
			.body(Full::new(Bytes::from(body)))
			.map_err(|e| Error::Internal(format!("Request build error: {}", e)))?;

		let response = self.client.request(request).await.map_err(|e| {
			warn!(error = %e, "Notification service unreachable");
			Error::ServiceUnavailable(format!("Network error: {}", e))
		})?;

		let status = response.status();
		if status.is_success() {
			debug!(channel = %message.channel, "Verification code handed to notification service");
			Ok(())
		} else {
			let body_bytes = response.into_body().collect().await.ok().map(|b| b.to_bytes());
			let body_str =
				body_bytes.as_ref().and_then(|b| std::str::from_utf8(b).ok()).unwrap_or("");
			warn!(%status, "Notification service rejected verification code: {}", body_str);
			Err(Error::ServiceUnavailable(format!("HTTP {}", status)))
		}
	}
}

// OtpVerifier //
//*************//
struct PendingCode {
	address: Box<str>,
	code: Box<str>,
	expires_at: Instant,
	attempts: u32,
}

pub struct OtpVerifier {
	ttl: Duration,
	codes: parking_lot::Mutex<LruCache<(KeycloakId, Channel), PendingCode>>,
	delivery: Arc<dyn CodeDelivery>,
}

impl OtpVerifier {
	pub fn new(ttl: Duration, capacity: usize, delivery: Arc<dyn CodeDelivery>) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
		Self { ttl, codes: parking_lot::Mutex::new(LruCache::new(capacity)), delivery }
	}

	fn generate_code() -> String {
		let mut rng = rand::rng();
		(0..CODE_LENGTH).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect()
	}
}

#[async_trait]
impl ChannelVerifier for OtpVerifier {
	async fn send_code(
		&self,
		channel: Channel,
		keycloak_id: KeycloakId,
		address: &str,
	) -> AppResult<u64> {
		let code = Self::generate_code();
		{
			let mut codes = self.codes.lock();
			codes.put(
				(keycloak_id, channel),
				PendingCode {
					address: address.into(),
					code: code.as_str().into(),
					expires_at: Instant::now() + self.ttl,
					attempts: 0,
				},
			);
		}

		let message = VerificationMessage { channel, keycloak_id, address, code: &code };
		if let Err(err) = self.delivery.deliver(&message).await {
			// a resend may have replaced the entry meanwhile
			let key = (keycloak_id, channel);
			let mut codes = self.codes.lock();
			if codes.peek(&key).is_some_and(|pending| pending.code.as_ref() == code) {
				codes.pop(&key);
			}
			return Err(err);
		}

		info!("Verification code sent to user {} over {}", keycloak_id, channel);
		Ok(self.ttl.as_secs())
	}

	async fn verify(
		&self,
		channel: Channel,
		keycloak_id: KeycloakId,
		address: &str,
		code: &str,
	) -> AppResult<bool> {
		let key = (keycloak_id, channel);
		let mut codes = self.codes.lock();

		let Some(pending) = codes.get_mut(&key) else {
			debug!("No pending verification code for user {} over {}", keycloak_id, channel);
			return Ok(false);
		};

		if pending.expires_at <= Instant::now() {
			codes.pop(&key);
			debug!("Verification code for user {} over {} expired", keycloak_id, channel);
			return Ok(false);
		}

		if pending.address.as_ref() != address || pending.code.as_ref() != code {
			pending.attempts += 1;
			if pending.attempts >= MAX_ATTEMPTS {
				warn!("Too many wrong verification codes for user {} over {}", keycloak_id, channel);
				codes.pop(&key);
			}
			return Ok(false);
		}

		codes.pop(&key);
		Ok(true)
	}
}


// vim: ts=4
