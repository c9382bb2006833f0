//! Role rules for channels and endpoints

use crate::prelude::*;
use user_settings_types::auth::AuthCtx;

/// Checks whether the caller may manage `channel` on their own settings
///
/// The Diia channel is bound to a citizen's tax number, so only citizens
/// can activate, deactivate or verify it.
pub fn check_channel_access(auth: &AuthCtx, channel: Channel) -> AppResult<()> {
	match channel {
		Channel::Email => Ok(()),
		Channel::Diia if auth.is_citizen() => Ok(()),
		Channel::Diia => {
			warn!("User {} without citizen role attempted to manage the {} channel", auth.keycloak_id, channel);
			Err(Error::PermissionDenied)
		}
	}
}

/// Reading another user's settings is an officer privilege
pub fn check_officer(auth: &AuthCtx) -> AppResult<()> {
	if auth.is_officer() {
		Ok(())
	} else {
		warn!("Non-officer user {} attempted to read foreign settings", auth.keycloak_id);
		Err(Error::PermissionDenied)
	}
}


// vim: ts=4
