//! Access token authentication middleware

use axum::{
	body::Body,
	extract::State,
	http::{HeaderMap, Request, header, response::Response},
	middleware::Next,
};

use crate::extract::Auth;
use crate::prelude::*;

pub const X_ACCESS_TOKEN: &str = "X-Access-Token";

/// Extracts the raw token from `X-Access-Token` or `Authorization: Bearer`
pub fn access_token(headers: &HeaderMap) -> Option<&str> {
	if let Some(token) = headers.get(X_ACCESS_TOKEN).and_then(|h| h.to_str().ok()) {
		let token = token.trim();
		return (!token.is_empty()).then_some(token);
	}

	headers
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.strip_prefix("Bearer "))
		.map(str::trim)
		.filter(|t| !t.is_empty())
}

pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> AppResult<Response<Body>> {
	let token = access_token(req.headers()).ok_or(Error::Unauthorized)?;
	let auth = app.token_decoder.decode(token)?;

	debug!(
		keycloak_id = %auth.keycloak_id,
		username = auth.username.as_deref().unwrap_or("-"),
		roles = ?auth.roles,
		"Authenticated request"
	);
	req.extensions_mut().insert(Auth(auth));

	Ok(next.run(req).await)
}


// vim: ts=4
