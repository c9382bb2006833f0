//! Settings HTTP API tests
//!
//! Drive the assembled router end to end: token decoding, role rules,
//! validation errors and channel state stored in SQLite.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use common::{VALID_CODE, VERIFICATION_TTL_SECS, citizen_token, create_test_app, officer_token, token};
use user_settings::types::{Channel, KeycloakId};

fn keycloak_id() -> KeycloakId {
	KeycloakId(Uuid::new_v4())
}

fn channel<'a>(settings: &'a Value, name: &str) -> Option<&'a Value> {
	settings["channels"].as_array()?.iter().find(|ch| ch["channel"] == name)
}

// Lookup //
//********//

#[tokio::test]
async fn test_find_own_settings_creates_empty_record() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	let (status, body) = t.get("/api/settings/me", Some(&tok)).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["settingsId"].is_string());
	assert_eq!(body["channels"], json!([]));

	let (_, again) = t.get("/api/settings/me", Some(&tok)).await;
	assert_eq!(again["settingsId"], body["settingsId"]);
}

#[tokio::test]
async fn test_find_own_settings_lists_activated_channel() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	let (status, _) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": "settings@gmail.com", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = t.get("/api/settings/me", Some(&tok)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["channels"][0]["channel"], "email");
	assert_eq!(body["channels"][0]["activated"], true);
	assert_eq!(body["channels"][0]["address"], "settings@gmail.com");
	assert!(body["channels"][0].get("deactivationReason").is_none());
}

#[tokio::test]
async fn test_officer_finds_settings_by_keycloak_id() {
	let t = create_test_app().await;
	let citizen = keycloak_id();
	let citizen_tok = citizen_token(citizen);

	let (_, own) = t.get("/api/settings/me", Some(&citizen_tok)).await;

	let path = format!("/api/settings/{}", citizen);
	let (status, body) = t.get(&path, Some(&officer_token(keycloak_id()))).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["settingsId"], own["settingsId"]);
}

#[tokio::test]
async fn test_find_by_keycloak_id_requires_officer() {
	let t = create_test_app().await;
	let path = format!("/api/settings/{}", keycloak_id());

	let (status, _) = t.get(&path, Some(&citizen_token(keycloak_id()))).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_find_by_unknown_keycloak_id() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	let path = format!("/api/settings/{}", keycloak_id());
	let (status, _) = t.get(&path, Some(&tok)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = t.get("/api/settings/not-a-uuid", Some(&tok)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

// Activation //
//************//

#[tokio::test]
async fn test_citizen_activates_diia_channel() {
	let t = create_test_app().await;
	let kc = keycloak_id();
	let tok = citizen_token(kc);

	let (status, _) = t
		.post(
			"/api/settings/me/channels/diia/activate",
			Some(&tok),
			json!({ "address": "0101010101", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let verified = t.verifier.verified.lock().clone();
	assert_eq!(verified, vec![(Channel::Diia, kc, "0101010101".to_string())]);

	let (_, body) = t.get("/api/settings/me", Some(&tok)).await;
	let diia = channel(&body, "diia").expect("diia channel");
	assert_eq!(diia["activated"], true);
	assert_eq!(diia["address"], "0101010101");
}

#[tokio::test]
async fn test_officer_cannot_activate_diia_channel() {
	let t = create_test_app().await;

	let (status, _) = t
		.post(
			"/api/settings/me/channels/diia/activate",
			Some(&officer_token(keycloak_id())),
			json!({ "address": "0101010101", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert!(t.verifier.verified.lock().is_empty());
}

#[tokio::test]
async fn test_activation_with_wrong_code_is_rejected() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": "settings@gmail.com", "verificationCode": "000000" }),
		)
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "E-VERIFICATION-FAILED");

	let (_, settings) = t.get("/api/settings/me", Some(&tok)).await;
	assert_eq!(settings["channels"], json!([]));
}

#[tokio::test]
async fn test_activation_validates_before_verifying() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": "user@mail.ru", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["message"], "Email address has restricted domain");

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": "settings@gmail.com" }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["message"], "Verification code is empty");

	assert!(t.verifier.verified.lock().is_empty());
}

#[tokio::test]
async fn test_activation_replaces_deactivated_state() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	t.post(
		"/api/settings/me/channels/email/deactivate",
		Some(&tok),
		json!({ "address": "old@gmail.com", "deactivationReason": "User deactivated" }),
	)
	.await;
	let (status, _) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": "new@gmail.com", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (_, body) = t.get("/api/settings/me", Some(&tok)).await;
	let email = channel(&body, "email").expect("email channel");
	assert_eq!(email["activated"], true);
	assert_eq!(email["address"], "new@gmail.com");
	assert!(email.get("deactivationReason").is_none());
	assert_eq!(body["channels"].as_array().map(Vec::len), Some(1));
}

// Deactivation //
//**************//

#[tokio::test]
async fn test_citizen_deactivates_diia_channel() {
	let t = create_test_app().await;
	let tok = citizen_token(keycloak_id());

	t.post(
		"/api/settings/me/channels/diia/activate",
		Some(&tok),
		json!({ "address": "0101010101", "verificationCode": VALID_CODE }),
	)
	.await;
	let (status, _) = t
		.post(
			"/api/settings/me/channels/diia/deactivate",
			Some(&tok),
			json!({ "deactivationReason": "User deactivated" }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (_, body) = t.get("/api/settings/me", Some(&tok)).await;
	let diia = channel(&body, "diia").expect("diia channel");
	assert_eq!(diia["activated"], false);
	assert_eq!(diia["deactivationReason"], "User deactivated");
	// stored address is kept when none is given
	assert_eq!(diia["address"], "0101010101");
}

#[tokio::test]
async fn test_officer_cannot_deactivate_diia_channel() {
	let t = create_test_app().await;

	let (status, _) = t
		.post(
			"/api/settings/me/channels/diia/deactivate",
			Some(&officer_token(keycloak_id())),
			json!({ "deactivationReason": "User deactivated" }),
		)
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivation_with_updated_address() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	t.post(
		"/api/settings/me/channels/email/activate",
		Some(&tok),
		json!({ "address": "old@gmail.com", "verificationCode": VALID_CODE }),
	)
	.await;
	let (status, _) = t
		.post(
			"/api/settings/me/channels/email/deactivate",
			Some(&tok),
			json!({ "address": "new@gmail.com", "deactivationReason": "User deactivated" }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (_, body) = t.get("/api/settings/me", Some(&tok)).await;
	let email = channel(&body, "email").expect("email channel");
	assert_eq!(email["activated"], false);
	assert_eq!(email["address"], "new@gmail.com");
}

#[tokio::test]
async fn test_deactivation_creates_missing_channel() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	let (status, _) = t
		.post(
			"/api/settings/me/channels/email/deactivate",
			Some(&tok),
			json!({ "address": "settings@gmail.com", "deactivationReason": "User deactivated" }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (_, body) = t.get("/api/settings/me", Some(&tok)).await;
	let email = channel(&body, "email").expect("email channel");
	assert_eq!(email["activated"], false);
	assert_eq!(email["address"], "settings@gmail.com");
	assert_eq!(email["deactivationReason"], "User deactivated");
}

#[tokio::test]
async fn test_deactivation_requires_reason() {
	let t = create_test_app().await;

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/deactivate",
			Some(&officer_token(keycloak_id())),
			json!({ "deactivationReason": "  " }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["code"], "E-DEACTIVATION-REASON-EMPTY");
}

#[tokio::test]
async fn test_deactivation_validates_new_address() {
	let t = create_test_app().await;

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/deactivate",
			Some(&officer_token(keycloak_id())),
			json!({ "address": "not-an-email", "deactivationReason": "User deactivated" }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["message"], "Email address is not valid");
}

// Email validation //
//******************//

#[tokio::test]
async fn test_validate_empty_email() {
	let t = create_test_app().await;

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/validate",
			Some(&officer_token(keycloak_id())),
			json!({ "address": "" }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["message"], "Email address is empty");
	assert_eq!(body["localizedMessage"], "Поле обов'язкове");
}

#[tokio::test]
async fn test_validate_email_results() {
	let t = create_test_app().await;
	let tok = citizen_token(keycloak_id());

	let (status, body) = t
		.post("/api/settings/me/channels/email/validate", Some(&tok), json!({ "address": "a@gmail.com" }))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, Value::Null);

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/validate",
			Some(&tok),
			json!({ "address": "user@mx.blocked.example" }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["code"], "E-EMAIL-RESTRICTED-DOMAIN");
	assert_eq!(body["localizedMessage"], "Недопустимий домен адреси електронної пошти");
}

#[tokio::test]
async fn test_validate_email_agrees_with_activation() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());
	let padded = " settings@gmail.com ";

	let (status, _) = t
		.post("/api/settings/me/channels/email/validate", Some(&tok), json!({ "address": padded }))
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": padded, "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (_, body) = t.get("/api/settings/me", Some(&tok)).await;
	let email = channel(&body, "email").expect("email channel");
	assert_eq!(email["address"], "settings@gmail.com");
}

#[tokio::test]
async fn test_validate_email_rejects_misplaced_dots() {
	let t = create_test_app().await;
	let tok = officer_token(keycloak_id());

	for address in ["..a..b@gmail.com", ".user@gmail.com", "user.@gmail.com"] {
		let (status, body) = t
			.post("/api/settings/me/channels/email/validate", Some(&tok), json!({ "address": address }))
			.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", address);
		assert_eq!(body["code"], "E-EMAIL-INVALID");
	}
}

// Verification codes //
//********************//

#[tokio::test]
async fn test_send_verification_code() {
	let t = create_test_app().await;
	let kc = keycloak_id();

	let (status, body) = t
		.post(
			"/api/settings/me/channels/email/verify",
			Some(&officer_token(kc)),
			json!({ "address": "settings@gmail.com" }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["verificationCodeExpirationSec"], VERIFICATION_TTL_SECS);

	let sent = t.verifier.sent.lock().clone();
	assert_eq!(sent, vec![(Channel::Email, kc, "settings@gmail.com".to_string())]);
}

#[tokio::test]
async fn test_send_verification_code_checks_role_and_address() {
	let t = create_test_app().await;

	let (status, _) = t
		.post(
			"/api/settings/me/channels/diia/verify",
			Some(&officer_token(keycloak_id())),
			json!({ "address": "0101010101" }),
		)
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, body) = t
		.post(
			"/api/settings/me/channels/diia/verify",
			Some(&citizen_token(keycloak_id())),
			json!({ "address": "12345" }),
		)
		.await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["localizedMessage"], "Невірний формат РНОКПП");

	assert!(t.verifier.sent.lock().is_empty());
}

// Authentication //
//****************//

#[tokio::test]
async fn test_unauthorized_without_token() {
	let t = create_test_app().await;

	let (status, _) = t.get("/api/settings", None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	let (status, body) = t.get("/api/settings/me", None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["code"], "E-AUTH-UNAUTHORIZED");
}

#[tokio::test]
async fn test_unauthorized_with_foreign_signature() {
	let t = create_test_app().await;
	let claims = json!({ "sub": keycloak_id().to_string(), "exp": u32::MAX });
	let forged = jsonwebtoken::encode(
		&jsonwebtoken::Header::default(),
		&claims,
		&jsonwebtoken::EncodingKey::from_secret(b"another-secret"),
	)
	.unwrap();

	let (status, _) = t.get("/api/settings/me", Some(&forged)).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
	let t = create_test_app().await;
	let tok = token(keycloak_id(), &[]);

	let req = axum::http::Request::builder()
		.uri("/api/settings/me")
		.header("Authorization", format!("Bearer {}", tok))
		.body(axum::body::Body::empty())
		.unwrap();
	let (status, _) = t.send(req).await;
	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_without_role_uses_email_only() {
	let t = create_test_app().await;
	let tok = token(keycloak_id(), &[]);

	let (status, _) = t
		.post(
			"/api/settings/me/channels/email/activate",
			Some(&tok),
			json!({ "address": "settings@gmail.com", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = t
		.post(
			"/api/settings/me/channels/diia/activate",
			Some(&tok),
			json!({ "address": "0101010101", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_channel_is_not_found() {
	let t = create_test_app().await;

	let (status, _) = t
		.post(
			"/api/settings/me/channels/sms/activate",
			Some(&citizen_token(keycloak_id())),
			json!({ "address": "0101010101", "verificationCode": VALID_CODE }),
		)
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
	let t = create_test_app().await;

	let req = axum::http::Request::builder()
		.uri("/api/settings/me")
		.header("X-Request-Id", "req-42")
		.body(axum::body::Body::empty())
		.unwrap();
	let res = tower::ServiceExt::oneshot(t.router.clone(), req).await.unwrap();
	assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(res.headers().get("X-Request-Id").and_then(|h| h.to_str().ok()), Some("req-42"));
}

// vim: ts=4
