//! Common types used throughout the settings service.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::error::Error;

// SettingsId //
//************//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsId(pub Uuid);

impl SettingsId {
	pub fn new_random() -> Self {
		SettingsId(Uuid::new_v4())
	}
}

impl std::fmt::Display for SettingsId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// KeycloakId //
//************//
/// Identifier of the user in the external identity provider (token `sub`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeycloakId(pub Uuid);

impl std::fmt::Display for KeycloakId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for KeycloakId {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s)
			.map(KeycloakId)
			.map_err(|_| Error::ValidationError(format!("Invalid keycloak id: {}", s)))
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}
}

// Channel //
//*********//
/// Notification delivery channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
	Email,
	/// National digital-identity messaging channel, addressed by tax number
	Diia,
}

impl Channel {
	pub const ALL: [Channel; 2] = [Channel::Email, Channel::Diia];

	pub fn as_str(self) -> &'static str {
		match self {
			Channel::Email => "email",
			Channel::Diia => "diia",
		}
	}
}

impl std::fmt::Display for Channel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for Channel {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Channel::ALL.into_iter().find(|ch| ch.as_str() == s).ok_or(Error::NotFound)
	}
}

// Settings //
//**********//
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
	pub settings_id: SettingsId,
	pub keycloak_id: KeycloakId,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

/// Stored state of one channel of a settings record
///
/// `activated` implies `address.is_some()` and `deactivation_reason.is_none()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationChannel {
	pub settings_id: SettingsId,
	pub channel: Channel,
	pub address: Option<Box<str>>,
	pub activated: bool,
	pub deactivation_reason: Option<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

/// Desired channel state passed to the adapter's upsert
#[derive(Clone, Debug)]
pub struct ChannelState<'a> {
	pub address: Option<&'a str>,
	pub activated: bool,
	pub deactivation_reason: Option<&'a str>,
}


// vim: ts=4
