//! Out-of-band channel verification.

use async_trait::async_trait;

use crate::prelude::*;
use crate::types::{Channel, KeycloakId};

/// Issues and checks verification codes proving control of a channel address
#[async_trait]
pub trait ChannelVerifier: Send + Sync {
	/// Generates a code for `address` and delivers it over `channel`
	///
	/// Returns the lifetime of the code in seconds.
	async fn send_code(
		&self,
		channel: Channel,
		keycloak_id: KeycloakId,
		address: &str,
	) -> AppResult<u64>;

	/// Checks a code previously sent to `address`
	async fn verify(
		&self,
		channel: Channel,
		keycloak_id: KeycloakId,
		address: &str,
		code: &str,
	) -> AppResult<bool>;
}

// vim: ts=4
