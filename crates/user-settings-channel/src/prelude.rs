pub use user_settings_core::prelude::*;

// vim: ts=4
