//! Custom middlewares

use axum::{
	body::Body,
	http::{HeaderValue, Request, response::Response},
	middleware::Next,
};
use tracing::Instrument;

pub const X_REQUEST_ID: &str = "X-Request-Id";

/// Tags every request with an id, taken from `X-Request-Id` or generated
pub async fn request_id(req: Request<Body>, next: Next) -> Response<Body> {
	let req_id = req
		.headers()
		.get(X_REQUEST_ID)
		.and_then(|h| h.to_str().ok())
		.filter(|id| !id.is_empty() && id.len() <= 128)
		.map_or_else(|| uuid::Uuid::new_v4().simple().to_string(), ToString::to_string);

	let span = tracing::info_span!("request", req_id = %req_id, method = %req.method(), path = %req.uri().path());
	let mut res = next.run(req).instrument(span).await;

	if let Ok(val) = HeaderValue::from_str(&req_id) {
		res.headers_mut().insert(X_REQUEST_ID, val);
	}
	res
}


// vim: ts=4
