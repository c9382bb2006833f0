pub use crate::error::{AppResult, Error};
pub use crate::types::{Channel, KeycloakId, SettingsId, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
