//! Settings management
//!
//! Settings are read from JSON. Every section and field is optional; missing
//! values fall back to `Default`.

use cinder_core::ecs::MAX_ENTITIES;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ecs: EcsSettings,
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsSettings {
    /// Size of the entity id pool, at most `MAX_ENTITIES`.
    pub entity_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of fixed ticks the runtime executes before exiting.
    pub ticks: u64,
    pub spawn_per_tick: u32,
    /// Ticks a spawned entity lives before it is destroyed.
    pub lifetime_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub default_level: String,
}

impl Default for EcsSettings {
    fn default() -> Self {
        Self {
            entity_capacity: MAX_ENTITIES,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ticks: 600,
            spawn_per_tick: 4,
            lifetime_ticks: 90,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let capacity = self.ecs.entity_capacity;
        if capacity == 0 || capacity > MAX_ENTITIES {
            return Err(SettingsError::Invalid {
                field: "ecs.entity_capacity",
                reason: format!("{capacity} is outside 1..={MAX_ENTITIES}"),
            });
        }
        if self.simulation.lifetime_ticks == 0 {
            return Err(SettingsError::Invalid {
                field: "simulation.lifetime_ticks",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.logging.default_level.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "logging.default_level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ecs.entity_capacity, MAX_ENTITIES);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings =
            Settings::from_json_str(r#"{ "ecs": { "entity_capacity": 64 }, "simulation": { "ticks": 5 } }"#)
                .unwrap();
        assert_eq!(settings.ecs.entity_capacity, 64);
        assert_eq!(settings.simulation.ticks, 5);
        assert_eq!(settings.simulation.spawn_per_tick, 4);
        assert_eq!(settings.logging.default_level, "info");
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let json = format!(r#"{{ "ecs": {{ "entity_capacity": {} }} }}"#, MAX_ENTITIES + 1);
        let err = Settings::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "ecs.entity_capacity",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Settings::from_json_str("{ ecs: }").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn load_round_trips_through_a_file() {
        let path = std::env::temp_dir().join(format!("cinder-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.simulation.lifetime_ticks = 12;
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::load("/definitely/not/here/cinder.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
