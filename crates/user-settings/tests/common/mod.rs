//! Shared setup for the HTTP API tests
//!
//! Every test gets its own SQLite database in a `TempDir`, a router built by
//! `AppBuilder`, and HS256 tokens signed with `TEST_SECRET`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
	Router,
	body::Body,
	http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use user_settings::AppBuilder;
use user_settings::app::App;
use user_settings::error::AppResult;
use user_settings::token::TokenValidation;
use user_settings::types::{Channel, KeycloakId};
use user_settings::verification::ChannelVerifier;
use user_settings_adapter_sqlite::SettingsAdapterSqlite;

pub const TEST_SECRET: &[u8] = b"settings-test-secret";
/// The only code the mock verifier accepts
pub const VALID_CODE: &str = "123456";
pub const VERIFICATION_TTL_SECS: u64 = 300;

/// Accepts `VALID_CODE` for any address and records sent codes
#[derive(Default)]
pub struct MockVerifier {
	pub sent: parking_lot::Mutex<Vec<(Channel, KeycloakId, String)>>,
	pub verified: parking_lot::Mutex<Vec<(Channel, KeycloakId, String)>>,
}

#[async_trait]
impl ChannelVerifier for MockVerifier {
	async fn send_code(
		&self,
		channel: Channel,
		keycloak_id: KeycloakId,
		address: &str,
	) -> AppResult<u64> {
		self.sent.lock().push((channel, keycloak_id, address.to_string()));
		Ok(VERIFICATION_TTL_SECS)
	}

	async fn verify(
		&self,
		channel: Channel,
		keycloak_id: KeycloakId,
		address: &str,
		code: &str,
	) -> AppResult<bool> {
		self.verified.lock().push((channel, keycloak_id, address.to_string()));
		Ok(code == VALID_CODE)
	}
}

pub struct TestApp {
	pub app: App,
	pub router: Router,
	pub verifier: Arc<MockVerifier>,
	_temp: TempDir,
}

pub async fn create_test_app() -> TestApp {
	let temp = TempDir::new().expect("Failed to create temp directory");
	let adapter = SettingsAdapterSqlite::new(temp.path()).await.expect("Failed to create adapter");
	let verifier = Arc::new(MockVerifier::default());

	let mut builder = AppBuilder::new();
	builder
		.token_validation(TokenValidation::Hs256(TEST_SECRET.into()))
		.restricted_email_domains(["blocked.example"])
		.settings_adapter(Arc::new(adapter))
		.verifier(verifier.clone());
	let app = builder.build().expect("Failed to build app");
	let router = user_settings::routes::init(app.clone());

	TestApp { app, router, verifier, _temp: temp }
}

pub fn token(keycloak_id: KeycloakId, roles: &[&str]) -> String {
	let exp = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or_default()
		+ 3600;
	let claims = json!({
		"sub": keycloak_id.to_string(),
		"exp": exp,
		"preferred_username": "test-user",
		"realm_access": { "roles": roles },
	});
	encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET))
		.expect("Failed to sign token")
}

pub fn officer_token(keycloak_id: KeycloakId) -> String {
	token(keycloak_id, &["officer"])
}

pub fn citizen_token(keycloak_id: KeycloakId) -> String {
	token(keycloak_id, &["citizen"])
}

impl TestApp {
	pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
		let res = self.router.clone().oneshot(req).await.expect("Request failed");
		let status = res.status();
		let bytes = res.into_body().collect().await.expect("Failed to read body").to_bytes();
		let body = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap_or(Value::Null)
		};
		(status, body)
	}

	pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
		let mut req = Request::builder().method("GET").uri(path);
		if let Some(token) = token {
			req = req.header("X-Access-Token", token);
		}
		self.send(req.body(Body::empty()).expect("Failed to build request")).await
	}

	pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
		let mut req =
			Request::builder().method("POST").uri(path).header("Content-Type", "application/json");
		if let Some(token) = token {
			req = req.header("X-Access-Token", token);
		}
		let body = Body::from(serde_json::to_vec(&body).expect("Failed to encode body"));
		self.send(req.body(body).expect("Failed to build request")).await
	}
}

// vim: ts=4
