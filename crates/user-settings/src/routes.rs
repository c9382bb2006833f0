//! HTTP routes

use axum::{
	Router, middleware,
	routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use user_settings_channel::handler;
use user_settings_core::{middleware::request_id, route_auth::require_auth};

async fn not_found() -> Error {
	Error::NotFound
}

fn init_settings(app: &App) -> Router<App> {
	Router::new()
		.route("/me", get(handler::get_own_settings))
		.route("/me/channels/email/validate", post(handler::post_validate_email))
		.route("/me/channels/{channel}/verify", post(handler::post_send_verification_code))
		.route("/me/channels/{channel}/activate", post(handler::post_activate_channel))
		.route("/me/channels/{channel}/deactivate", post(handler::post_deactivate_channel))
		.route("/{keycloak_id}", get(handler::get_settings_by_keycloak_id))
		.fallback(not_found)
		// `layer` instead of `route_layer` so unknown paths are authenticated too
		.layer(middleware::from_fn_with_state(app.clone(), require_auth))
}

pub fn init(app: App) -> Router {
	Router::new()
		.nest("/api/settings", init_settings(&app))
		.fallback(not_found)
		.layer(TraceLayer::new_for_http())
		.layer(middleware::from_fn(request_id))
		.with_state(app)
}

// vim: ts=4
