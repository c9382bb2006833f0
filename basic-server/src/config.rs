//! Server configuration read from the environment

use std::{env, path::PathBuf, time::Duration};

use user_settings::error::{AppResult, Error};
use user_settings::token::TokenValidation;

pub struct Config {
	pub listen: String,
	pub db_dir: PathBuf,
	pub token_secret: Option<String>,
	pub token_public_key_file: Option<PathBuf>,
	pub verification_ttl: Duration,
	pub notification_url: Option<String>,
	pub restricted_email_domains: Vec<String>,
}

fn var(name: &str) -> Option<String> {
	env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Splits a comma separated list, dropping empty items
fn parse_list(value: &str) -> Vec<String> {
	value.split(',').map(str::trim).filter(|d| !d.is_empty()).map(ToString::to_string).collect()
}

impl Config {
	pub fn from_env() -> AppResult<Self> {
		let verification_ttl = match var("VERIFICATION_TTL_SECS") {
			Some(secs) => Duration::from_secs(secs.parse().map_err(|_| {
				Error::ConfigError(format!("VERIFICATION_TTL_SECS is not a number: {}", secs))
			})?),
			None => Duration::from_secs(300),
		};

		Ok(Config {
			listen: var("LISTEN").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
			db_dir: PathBuf::from(var("DB_DIR").unwrap_or_else(|| "./data".to_string())),
			token_secret: var("TOKEN_SECRET"),
			token_public_key_file: var("TOKEN_PUBLIC_KEY_FILE").map(PathBuf::from),
			verification_ttl,
			notification_url: var("NOTIFICATION_URL"),
			restricted_email_domains: var("RESTRICTED_EMAIL_DOMAINS")
				.map(|v| parse_list(&v))
				.unwrap_or_default(),
		})
	}

	/// A shared secret takes precedence over a public key file
	pub async fn token_validation(&self) -> AppResult<TokenValidation> {
		if let Some(secret) = &self.token_secret {
			return Ok(TokenValidation::Hs256(secret.as_bytes().into()));
		}
		if let Some(path) = &self.token_public_key_file {
			let pem = tokio::fs::read_to_string(path).await.map_err(|e| {
				Error::ConfigError(format!("Cannot read {}: {}", path.display(), e))
			})?;
			return Ok(TokenValidation::Rs256(pem.into()));
		}
		Ok(TokenValidation::Trusted)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_list() {
		assert_eq!(parse_list("example.org, .blocked.net,,"), vec!["example.org", ".blocked.net"]);
		assert!(parse_list(" , ").is_empty());
	}
}

// vim: ts=4
