//! Settings and channel operations
//!
//! Handlers stay thin: they parse the request and call into these functions,
//! which apply the role rules, validate input and talk to the adapters.

use crate::prelude::*;
use crate::types::{
	ActivateChannelInput, AddressInput, ChannelReadDto, DeactivateChannelInput, SettingsReadDto,
};
use crate::validate::{AddressValidator, DEACTIVATION_REASON_EMPTY, VERIFICATION_CODE_EMPTY};
use user_settings_core::roles::{check_channel_access, check_officer};
use user_settings_types::auth::AuthCtx;
use user_settings_types::types::{ChannelState, Settings};

/// Returns the user's settings record, creating it on first access
pub async fn find_or_create_settings(app: &App, keycloak_id: KeycloakId) -> AppResult<Settings> {
	if let Some(settings) = app.settings_adapter.read_settings_by_keycloak_id(keycloak_id).await? {
		return Ok(settings);
	}

	let settings = app.settings_adapter.create_settings(keycloak_id).await?;
	info!("Created settings {} for user {}", settings.settings_id, keycloak_id);
	Ok(settings)
}

async fn read_settings(app: &App, settings: &Settings) -> AppResult<SettingsReadDto> {
	let channels = app.settings_adapter.list_channels(settings.settings_id).await?;
	Ok(SettingsReadDto {
		settings_id: settings.settings_id,
		channels: channels.into_iter().map(ChannelReadDto::from).collect(),
	})
}

/// Settings of the caller
pub async fn find_own_settings(app: &App, auth: &AuthCtx) -> AppResult<SettingsReadDto> {
	let settings = find_or_create_settings(app, auth.keycloak_id).await?;
	read_settings(app, &settings).await
}

/// Settings of another user, officers only
pub async fn find_settings_by_keycloak_id(
	app: &App,
	auth: &AuthCtx,
	keycloak_id: KeycloakId,
) -> AppResult<SettingsReadDto> {
	check_officer(auth)?;

	let settings = app
		.settings_adapter
		.read_settings_by_keycloak_id(keycloak_id)
		.await?
		.ok_or(Error::NotFound)?;
	read_settings(app, &settings).await
}

pub async fn activate_channel(
	app: &App,
	auth: &AuthCtx,
	channel: Channel,
	input: &ActivateChannelInput,
) -> AppResult<()> {
	check_channel_access(auth, channel)?;

	let validator = app.ext::<AddressValidator>()?;
	let address = input.address.trim();
	validator.validate(channel, address)?;

	let code = input.verification_code.trim();
	if code.is_empty() {
		return Err(VERIFICATION_CODE_EMPTY.into());
	}

	if !app.verifier.verify(channel, auth.keycloak_id, address, code).await? {
		warn!("Verification of {} channel failed for user {}", channel, auth.keycloak_id);
		return Err(Error::VerificationFailed);
	}

	let settings = find_or_create_settings(app, auth.keycloak_id).await?;
	let state = ChannelState { address: Some(address), activated: true, deactivation_reason: None };
	app.settings_adapter.upsert_channel(settings.settings_id, channel, &state).await?;

	info!("User {} activated {} channel", auth.keycloak_id, channel);
	Ok(())
}

pub async fn deactivate_channel(
	app: &App,
	auth: &AuthCtx,
	channel: Channel,
	input: &DeactivateChannelInput,
) -> AppResult<()> {
	check_channel_access(auth, channel)?;

	let reason = input.deactivation_reason.trim();
	if reason.is_empty() {
		return Err(DEACTIVATION_REASON_EMPTY.into());
	}

	let new_address = input.address.as_deref().map(str::trim);
	if let Some(address) = new_address {
		app.ext::<AddressValidator>()?.validate(channel, address)?;
	}

	let settings = find_or_create_settings(app, auth.keycloak_id).await?;
	let stored = match new_address {
		Some(_) => None,
		None => app.settings_adapter.read_channel(settings.settings_id, channel).await?,
	};
	let address = new_address.or_else(|| stored.as_ref().and_then(|ch| ch.address.as_deref()));

	let state = ChannelState { address, activated: false, deactivation_reason: Some(reason) };
	app.settings_adapter.upsert_channel(settings.settings_id, channel, &state).await?;

	info!("User {} deactivated {} channel: {}", auth.keycloak_id, channel, reason);
	Ok(())
}

/// Sends a verification code that a later activation must present
pub async fn send_verification_code(
	app: &App,
	auth: &AuthCtx,
	channel: Channel,
	input: &AddressInput,
) -> AppResult<u64> {
	check_channel_access(auth, channel)?;

	let address = input.address.trim();
	app.ext::<AddressValidator>()?.validate(channel, address)?;

	app.verifier.send_code(channel, auth.keycloak_id, address).await
}

pub fn validate_email(app: &App, input: &AddressInput) -> AppResult<()> {
	app.ext::<AddressValidator>()?.validate_email(input.address.trim())?;
	Ok(())
}

// vim: ts=4
