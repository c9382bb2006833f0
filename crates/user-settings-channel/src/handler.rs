//! Settings and channel HTTP handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};

use crate::prelude::*;
use crate::service;
use crate::types::{
	ActivateChannelInput, AddressInput, DeactivateChannelInput, SettingsReadDto,
	VerificationCodeSent,
};
use user_settings_core::extract::Auth;

/// GET /api/settings/me
pub async fn get_own_settings(
	State(app): State<App>,
	Auth(auth): Auth,
) -> AppResult<(StatusCode, Json<SettingsReadDto>)> {
	let settings = service::find_own_settings(&app, &auth).await?;
	Ok((StatusCode::OK, Json(settings)))
}

/// GET /api/settings/{keycloakId}
pub async fn get_settings_by_keycloak_id(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(keycloak_id): Path<String>,
) -> AppResult<(StatusCode, Json<SettingsReadDto>)> {
	let keycloak_id = keycloak_id.parse::<KeycloakId>()?;
	let settings = service::find_settings_by_keycloak_id(&app, &auth, keycloak_id).await?;
	Ok((StatusCode::OK, Json(settings)))
}

/// POST /api/settings/me/channels/{channel}/activate
pub async fn post_activate_channel(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(channel): Path<String>,
	Json(input): Json<ActivateChannelInput>,
) -> AppResult<StatusCode> {
	let channel = channel.parse::<Channel>()?;
	service::activate_channel(&app, &auth, channel, &input).await?;
	Ok(StatusCode::OK)
}

/// POST /api/settings/me/channels/{channel}/deactivate
pub async fn post_deactivate_channel(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(channel): Path<String>,
	Json(input): Json<DeactivateChannelInput>,
) -> AppResult<StatusCode> {
	let channel = channel.parse::<Channel>()?;
	service::deactivate_channel(&app, &auth, channel, &input).await?;
	Ok(StatusCode::OK)
}

/// POST /api/settings/me/channels/{channel}/verify
pub async fn post_send_verification_code(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(channel): Path<String>,
	Json(input): Json<AddressInput>,
) -> AppResult<(StatusCode, Json<VerificationCodeSent>)> {
	let channel = channel.parse::<Channel>()?;
	let ttl = service::send_verification_code(&app, &auth, channel, &input).await?;
	Ok((StatusCode::OK, Json(VerificationCodeSent { verification_code_expiration_sec: ttl })))
}

/// POST /api/settings/me/channels/email/validate
pub async fn post_validate_email(
	State(app): State<App>,
	Auth(_auth): Auth,
	Json(input): Json<AddressInput>,
) -> AppResult<StatusCode> {
	service::validate_email(&app, &input)?;
	Ok(StatusCode::OK)
}

// vim: ts=4
