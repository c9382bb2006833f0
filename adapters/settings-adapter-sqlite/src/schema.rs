//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		settings_id text NOT NULL,
		keycloak_id text NOT NULL,
		created_at integer NOT NULL,
		updated_at integer NOT NULL,
		PRIMARY KEY(settings_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_settings_keycloak_id ON settings(keycloak_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Notification channels
	//***********************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS notification_channels (
		channel_id integer PRIMARY KEY AUTOINCREMENT,
		settings_id text NOT NULL REFERENCES settings(settings_id),
		channel text NOT NULL,
		address text,
		activated boolean NOT NULL DEFAULT 0,
		deactivation_reason text,
		created_at integer NOT NULL,
		updated_at integer NOT NULL
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_notification_channels_settings_channel
		ON notification_channels(settings_id, channel)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
