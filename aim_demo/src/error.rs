//! Demo errors

use collision_engine::config::ConfigError;
use collision_engine::CollisionError;
use thiserror::Error;

/// Anything that can stop the demo
#[derive(Error, Debug)]
pub enum DemoError {
    /// Config file could not be read or parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Collision engine rejected a volume or removal
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    /// A setting is out of range
    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting {
        /// Field name in the config file
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result alias for the demo
pub type Result<T> = std::result::Result<T, DemoError>;
