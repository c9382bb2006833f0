//! Settings record management

use sqlx::SqlitePool;

use crate::utils::{db_err, map_row, settings_from_row};
use user_settings_types::prelude::*;
use user_settings_types::types::Settings;

const SELECT_SETTINGS: &str =
	"SELECT settings_id, keycloak_id, created_at, updated_at FROM settings";

pub(crate) async fn read_by_keycloak_id(
	db: &SqlitePool,
	keycloak_id: KeycloakId,
) -> AppResult<Option<Settings>> {
	let row = sqlx::query(&format!("{} WHERE keycloak_id = ?", SELECT_SETTINGS))
		.bind(keycloak_id.0.to_string())
		.fetch_optional(db)
		.await
		.map_err(db_err)?;

	row.map(|row| map_row(&row, settings_from_row)).transpose()
}

/// Create a settings record, keeping the existing one on conflict
pub(crate) async fn create(db: &SqlitePool, keycloak_id: KeycloakId) -> AppResult<Settings> {
	let now = Timestamp::now();
	let res = sqlx::query(
		"INSERT INTO settings (settings_id, keycloak_id, created_at, updated_at)
		VALUES (?, ?, ?, ?)
		ON CONFLICT(keycloak_id) DO NOTHING",
	)
	.bind(SettingsId::new_random().0.to_string())
	.bind(keycloak_id.0.to_string())
	.bind(now.0)
	.bind(now.0)
	.execute(db)
	.await
	.map_err(db_err)?;

	if res.rows_affected() == 0 {
		debug!("Settings for {} already exist", keycloak_id);
	}

	read_by_keycloak_id(db, keycloak_id).await?.ok_or(Error::DbError)
}

// vim: ts=4
