//! Access token decoding
//!
//! Tokens are Keycloak-issued JWTs. The keycloak id comes from `sub`, the
//! roles from `realm_access.roles`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::prelude::*;
use user_settings_types::auth::AuthCtx;

/// How access token signatures are checked
#[derive(Clone)]
pub enum TokenValidation {
	/// HMAC-SHA256 with a shared secret
	Hs256(Box<[u8]>),
	/// RSA-SHA256 with a PEM encoded public key
	Rs256(Box<str>),
	/// Signature is not checked, the gateway in front of the service is trusted
	Trusted,
}

impl std::fmt::Debug for TokenValidation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TokenValidation::Hs256(_) => f.write_str("Hs256(..)"),
			TokenValidation::Rs256(_) => f.write_str("Rs256(..)"),
			TokenValidation::Trusted => f.write_str("Trusted"),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct RealmAccess {
	#[serde(default)]
	roles: Vec<Box<str>>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
	sub: Box<str>,
	exp: Option<i64>,
	preferred_username: Option<Box<str>>,
	#[serde(default)]
	realm_access: RealmAccess,
}

/// Peek at a JWT payload without verifying the signature
fn decode_jwt_no_verify<T: DeserializeOwned>(jwt: &str) -> AppResult<T> {
	let mut parts = jwt.splitn(3, '.');
	let _header = parts.next().ok_or(Error::Parse)?;
	let payload = parts.next().ok_or(Error::Parse)?;
	let _sig = parts.next().ok_or(Error::Parse)?;
	let payload = URL_SAFE_NO_PAD.decode(payload.as_bytes()).map_err(|_| Error::Parse)?;
	let payload: T = serde_json::from_slice(&payload).map_err(|_| Error::Parse)?;
	Ok(payload)
}

enum Verifier {
	Signed { key: DecodingKey, validation: Validation },
	Trusted,
}

pub struct TokenDecoder {
	verifier: Verifier,
}

impl TokenDecoder {
	pub fn new(mode: &TokenValidation) -> AppResult<Self> {
		let (key, mut validation) = match mode {
			TokenValidation::Hs256(secret) => {
				(DecodingKey::from_secret(secret), Validation::new(Algorithm::HS256))
			}
			TokenValidation::Rs256(pem) => {
				let key = DecodingKey::from_rsa_pem(pem.as_bytes())
					.map_err(|e| Error::ConfigError(format!("Invalid token public key: {}", e)))?;
				(key, Validation::new(Algorithm::RS256))
			}
			TokenValidation::Trusted => {
				warn!("Access token signatures are NOT verified, trusting the gateway");
				return Ok(Self { verifier: Verifier::Trusted });
			}
		};
		// Keycloak puts the client list into `aud`, it carries no meaning here
		validation.validate_aud = false;

		Ok(Self { verifier: Verifier::Signed { key, validation } })
	}

	pub fn decode(&self, token: &str) -> AppResult<AuthCtx> {
		let claims = match &self.verifier {
			Verifier::Signed { key, validation } => {
				decode::<AccessTokenClaims>(token, key, validation)
					.map_err(|e| {
						debug!("Rejected access token: {}", e);
						Error::Unauthorized
					})?
					.claims
			}
			Verifier::Trusted => {
				let claims = decode_jwt_no_verify::<AccessTokenClaims>(token).map_err(|_| {
					debug!("Rejected malformed access token");
					Error::Unauthorized
				})?;
				if claims.exp.is_some_and(|exp| exp < Timestamp::now().0) {
					debug!("Rejected expired access token");
					return Err(Error::Unauthorized);
				}
				claims
			}
		};

		let keycloak_id = claims.sub.parse::<KeycloakId>().map_err(|_| {
			debug!("Access token subject is not a UUID: {}", claims.sub);
			Error::Unauthorized
		})?;

		Ok(AuthCtx {
			keycloak_id,
			username: claims.preferred_username,
			roles: claims.realm_access.roles.into_boxed_slice(),
		})
	}
}


// vim: ts=4
