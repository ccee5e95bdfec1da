//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::physics::BroadPhaseKind;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Load configuration from file, or defaults when the file does not exist
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if std::path::Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {path}, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Collision world settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Which broad-phase strategy runs each step
    pub broad_phase: BroadPhaseKind,

    /// Run the reference strategy alongside and warn on any disagreement
    pub verify_broad_phase: bool,

    /// Length of the aiming segment cast from an entity's forward vector
    pub aim_distance: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            broad_phase: BroadPhaseKind::SweepAndPrune,
            verify_broad_phase: false,
            aim_distance: 5000.0,
        }
    }
}

impl Config for CollisionConfig {}
