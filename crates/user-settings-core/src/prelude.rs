pub use crate::app::App;
pub use user_settings_types::prelude::*;

// vim: ts=4
