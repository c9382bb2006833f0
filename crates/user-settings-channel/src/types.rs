//! Request and response bodies of the channel API

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;
use user_settings_types::types::NotificationChannel;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsReadDto {
	pub settings_id: SettingsId,
	pub channels: Vec<ChannelReadDto>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReadDto {
	pub channel: Channel,
	pub activated: bool,
	pub address: Option<Box<str>>,
	pub deactivation_reason: Option<Box<str>>,
}

impl From<NotificationChannel> for ChannelReadDto {
	fn from(ch: NotificationChannel) -> Self {
		Self {
			channel: ch.channel,
			activated: ch.activated,
			address: ch.address,
			deactivation_reason: ch.deactivation_reason,
		}
	}
}

/// POST /me/channels/{channel}/activate
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivateChannelInput {
	pub address: String,
	pub verification_code: String,
}

/// POST /me/channels/{channel}/deactivate
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeactivateChannelInput {
	pub address: Option<String>,
	pub deactivation_reason: String,
}

/// POST /me/channels/email/validate and /me/channels/{channel}/verify
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressInput {
	pub address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCodeSent {
	pub verification_code_expiration_sec: u64,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_channel_dto_omits_absent_fields() {
		let dto = ChannelReadDto {
			channel: Channel::Email,
			activated: true,
			address: Some("settings@gmail.com".into()),
			deactivation_reason: None,
		};
		let value = serde_json::to_value(&dto).unwrap();
		assert_eq!(value, json!({ "channel": "email", "activated": true, "address": "settings@gmail.com" }));
	}

	#[test]
	fn test_inputs_tolerate_missing_fields() {
		let input: ActivateChannelInput = serde_json::from_str(r#"{"address":"a@b.com"}"#).unwrap();
		assert_eq!(input.address, "a@b.com");
		assert!(input.verification_code.is_empty());

		let input: DeactivateChannelInput =
			serde_json::from_str(r#"{"deactivationReason":"User deactivated"}"#).unwrap();
		assert!(input.address.is_none());
		assert_eq!(input.deactivation_reason, "User deactivated");
	}
}

// vim: ts=4
