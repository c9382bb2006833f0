//! Notification channel management

use sqlx::SqlitePool;

use crate::utils::{channel_from_row, db_err, map_row};
use user_settings_types::prelude::*;
use user_settings_types::types::{ChannelState, NotificationChannel};

const CHANNEL_COLUMNS: &str =
	"settings_id, channel, address, activated, deactivation_reason, created_at, updated_at";

pub(crate) async fn list(
	db: &SqlitePool,
	settings_id: SettingsId,
) -> AppResult<Vec<NotificationChannel>> {
	let rows = sqlx::query(&format!(
		"SELECT {} FROM notification_channels WHERE settings_id = ?
		ORDER BY created_at, channel",
		CHANNEL_COLUMNS
	))
	.bind(settings_id.0.to_string())
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	rows.iter().map(|row| map_row(row, channel_from_row)).collect()
}

pub(crate) async fn read(
	db: &SqlitePool,
	settings_id: SettingsId,
	channel: Channel,
) -> AppResult<Option<NotificationChannel>> {
	let row = sqlx::query(&format!(
		"SELECT {} FROM notification_channels WHERE settings_id = ? AND channel = ?",
		CHANNEL_COLUMNS
	))
	.bind(settings_id.0.to_string())
	.bind(channel.as_str())
	.fetch_optional(db)
	.await
	.map_err(db_err)?;

	row.map(|row| map_row(&row, channel_from_row)).transpose()
}

pub(crate) async fn upsert(
	db: &SqlitePool,
	settings_id: SettingsId,
	channel: Channel,
	state: &ChannelState<'_>,
) -> AppResult<NotificationChannel> {
	let now = Timestamp::now();
	let mut tx = db.begin().await.map_err(db_err)?;

	let row = sqlx::query(&format!(
		"INSERT INTO notification_channels
		(settings_id, channel, address, activated, deactivation_reason, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?, ?, ?)
		ON CONFLICT(settings_id, channel) DO UPDATE SET
			address = excluded.address,
			activated = excluded.activated,
			deactivation_reason = excluded.deactivation_reason,
			updated_at = excluded.updated_at
		RETURNING {}",
		CHANNEL_COLUMNS
	))
	.bind(settings_id.0.to_string())
	.bind(channel.as_str())
	.bind(state.address)
	.bind(state.activated)
	.bind(state.deactivation_reason)
	.bind(now.0)
	.bind(now.0)
	.fetch_one(&mut *tx)
	.await
	.map_err(db_err)?;

	sqlx::query("UPDATE settings SET updated_at = ? WHERE settings_id = ?")
		.bind(now.0)
		.bind(settings_id.0.to_string())
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;

	tx.commit().await.map_err(db_err)?;

	map_row(&row, channel_from_row)
}

// vim: ts=4
