//! Adapter that stores settings records and their notification channels.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{Channel, ChannelState, KeycloakId, NotificationChannel, Settings, SettingsId};

#[async_trait]
pub trait SettingsAdapter: Debug + Send + Sync {
	/// Reads the settings record of a user, `None` if it does not exist yet
	async fn read_settings_by_keycloak_id(
		&self,
		keycloak_id: KeycloakId,
	) -> AppResult<Option<Settings>>;

	/// Creates the settings record of a user
	///
	/// Returns the existing record if another request created it first.
	async fn create_settings(&self, keycloak_id: KeycloakId) -> AppResult<Settings>;

	/// Lists the channels of a settings record, oldest first
	async fn list_channels(&self, settings_id: SettingsId) -> AppResult<Vec<NotificationChannel>>;

	async fn read_channel(
		&self,
		settings_id: SettingsId,
		channel: Channel,
	) -> AppResult<Option<NotificationChannel>>;

	/// Inserts or replaces the state of one channel
	async fn upsert_channel(
		&self,
		settings_id: SettingsId,
		channel: Channel,
		state: &ChannelState<'_>,
	) -> AppResult<NotificationChannel>;
}

// vim: ts=4
