//! SQLite implementation of the settings adapter.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use user_settings_types::prelude::*;
use user_settings_types::settings_adapter::SettingsAdapter;
use user_settings_types::types::{ChannelState, NotificationChannel, Settings};

mod channel;
mod schema;
mod settings;
mod utils;

const DB_FILE: &str = "settings.db";

#[derive(Debug)]
pub struct SettingsAdapterSqlite {
	db: SqlitePool,
}

impl SettingsAdapterSqlite {
	/// Opens (or creates) the settings database inside `dir`
	pub async fn new(dir: impl AsRef<Path>) -> AppResult<Self> {
		tokio::fs::create_dir_all(dir.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(dir.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!("Settings database opened at {}", dir.as_ref().display());
		Ok(Self { db })
	}
}

#[async_trait]
impl SettingsAdapter for SettingsAdapterSqlite {
	// Settings management
	//*********************
	async fn read_settings_by_keycloak_id(
		&self,
		keycloak_id: KeycloakId,
	) -> AppResult<Option<Settings>> {
		settings::read_by_keycloak_id(&self.db, keycloak_id).await
	}

	async fn create_settings(&self, keycloak_id: KeycloakId) -> AppResult<Settings> {
		settings::create(&self.db, keycloak_id).await
	}

	// Channel management
	//********************
	async fn list_channels(&self, settings_id: SettingsId) -> AppResult<Vec<NotificationChannel>> {
		channel::list(&self.db, settings_id).await
	}

	async fn read_channel(
		&self,
		settings_id: SettingsId,
		channel: Channel,
	) -> AppResult<Option<NotificationChannel>> {
		channel::read(&self.db, settings_id, channel).await
	}

	async fn upsert_channel(
		&self,
		settings_id: SettingsId,
		channel: Channel,
		state: &ChannelState<'_>,
	) -> AppResult<NotificationChannel> {
		channel::upsert(&self.db, settings_id, channel, state).await
	}
}

// vim: ts=4
