//! Demo settings, loaded from `.toml` or `.ron`

use crate::error::{DemoError, Result};
use collision_engine::config::{CollisionConfig, Config};
use serde::{Deserialize, Serialize};

/// Everything the headless demo needs to build and run its scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of simulation steps to run
    pub steps: u32,
    /// Fixed step length in seconds
    pub delta_time: f32,
    /// Targets alive at any time; destroyed ones are replaced
    pub target_count: usize,
    /// Seed for target placement and motion
    pub seed: u64,
    /// Half-width of the cube targets drift in
    pub arena_extent: f32,
    /// Slowest target speed, units per second
    pub target_speed_min: f32,
    /// Fastest target speed, units per second
    pub target_speed_max: f32,
    /// Ship yaw rate in radians per second
    pub turn_rate: f32,
    /// Projectile speed, units per second
    pub projectile_speed: f32,
    /// Seconds a projectile lives before expiring
    pub projectile_lifetime: f32,
    /// Minimum seconds between shots
    pub fire_interval: f32,
    /// Collision world settings
    pub collision: CollisionConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            steps: 600,
            delta_time: 1.0 / 60.0,
            target_count: 12,
            seed: 42,
            arena_extent: 60.0,
            target_speed_min: 3.0,
            target_speed_max: 7.0,
            turn_rate: 0.8,
            projectile_speed: 80.0,
            projectile_lifetime: 1.5,
            fire_interval: 0.25,
            collision: CollisionConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Reject settings the scene generator cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("delta_time", self.delta_time),
            ("arena_extent", self.arena_extent),
            ("projectile_speed", self.projectile_speed),
            ("projectile_lifetime", self.projectile_lifetime),
            ("collision.aim_distance", self.collision.aim_distance),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(name, format!("must be positive, got {value}")));
            }
        }
        if !(0.0..=self.target_speed_max).contains(&self.target_speed_min) {
            return Err(invalid(
                "target_speed_min",
                format!("must lie in 0..={}, got {}", self.target_speed_max, self.target_speed_min),
            ));
        }
        if self.fire_interval < 0.0 {
            return Err(invalid("fire_interval", "must not be negative".to_string()));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> DemoError {
    DemoError::InvalidSetting { name, reason }
}

impl Config for DemoConfig {}
