//! Row mapping helpers

use sqlx::{Row, sqlite::SqliteRow};
use uuid::Uuid;

use user_settings_types::prelude::*;
use user_settings_types::types::{NotificationChannel, Settings};

pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

fn parse_uuid(row: &SqliteRow, col: &str) -> Result<Uuid, sqlx::Error> {
	let s: &str = row.try_get(col)?;
	Uuid::parse_str(s).map_err(|e| sqlx::Error::ColumnDecode {
		index: col.to_string(),
		source: Box::new(e),
	})
}

pub(crate) fn settings_from_row(row: &SqliteRow) -> Result<Settings, sqlx::Error> {
	Ok(Settings {
		settings_id: SettingsId(parse_uuid(row, "settings_id")?),
		keycloak_id: KeycloakId(parse_uuid(row, "keycloak_id")?),
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

pub(crate) fn channel_from_row(row: &SqliteRow) -> Result<NotificationChannel, sqlx::Error> {
	let channel: &str = row.try_get("channel")?;
	let channel = channel.parse::<Channel>().map_err(|_| sqlx::Error::ColumnDecode {
		index: "channel".to_string(),
		source: format!("unknown channel '{}'", channel).into(),
	})?;
	Ok(NotificationChannel {
		settings_id: SettingsId(parse_uuid(row, "settings_id")?),
		channel,
		address: row.try_get::<Option<String>, _>("address")?.map(Into::into),
		activated: row.try_get("activated")?,
		deactivation_reason: row
			.try_get::<Option<String>, _>("deactivation_reason")?
			.map(Into::into),
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

pub(crate) fn map_row<T>(
	row: &SqliteRow,
	f: impl FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
) -> AppResult<T> {
	f(row).map_err(db_err)
}

// vim: ts=4
