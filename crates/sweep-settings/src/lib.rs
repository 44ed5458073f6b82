//! # sweep-settings
//!
//! Configuration for the Sweep engine with layered sources:
//!
//! 1. Compiled [`SweepSettings::default()`]
//! 2. `~/.sweep/settings.json`, deep-merged over defaults
//! 3. Environment variable overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::SweepSettings;
