//! Cinder Services Layer
//!
//! Platform-facing services around the core. Currently: settings.

pub mod settings;

pub use settings::{EcsSettings, LoggingSettings, Settings, SettingsError, SimulationSettings};
