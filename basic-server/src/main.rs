use std::sync::Arc;

use user_settings::AppBuilder;
use user_settings::error::AppResult;
use user_settings_adapter_sqlite::SettingsAdapterSqlite;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> AppResult<()> {
	let mut builder = AppBuilder::new();

	let config = Config::from_env().inspect_err(|e| tracing::error!("FATAL: {}", e))?;
	let settings_adapter = Arc::new(
		SettingsAdapterSqlite::new(&config.db_dir)
			.await
			.inspect_err(|e| tracing::error!("FATAL: Cannot open settings database: {}", e))?,
	);

	builder
		.listen(config.listen.as_str())
		.token_validation(config.token_validation().await?)
		.verification_ttl(config.verification_ttl)
		.restricted_email_domains(config.restricted_email_domains.iter().map(String::as_str))
		.settings_adapter(settings_adapter);
	if let Some(url) = &config.notification_url {
		builder.notification_url(url.as_str());
	}

	builder.run().await
}

// vim: ts=4
