//! # playbill-settings
//!
//! Configuration for the playbill pipeline, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`PlaybillSettings::default()`]
//! 2. **Settings file**: `~/.playbill/settings.json` or an explicit path
//!    (deep-merged over defaults)
//! 3. **Environment variables**: `PLAYBILL_*` overrides (highest priority)
//!
//! Settings are passed explicitly to every stage; there is no global.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
