// Simulation configuration, loaded from JSON. Every section has defaults, so a
// config file only needs the fields it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::Steering;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub room: RoomConfig,
    pub redirector: RedirectorConfig,
    pub resetter: ResetterConfig,
    pub walker: WalkerConfig,
    pub time: TimeConfig,
    pub grid: GridConfig,
    pub rewards: RewardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub width: f32,
    pub depth: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Radius in meters of the arc walked under full-strength steering.
    pub curvature_radius: f32,
    /// How often a planning redirector refreshes its plan.
    pub planning_interval_ms: u64,
}

impl Default for RedirectorConfig {
    fn default() -> Self {
        Self {
            curvature_radius: 7.5,
            planning_interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetterConfig {
    /// Distance inside the room walls at which a reset is triggered.
    pub boundary_buffer: f32,
    /// Physical turn the user performs during a reset, in degrees.
    pub turn_angle: f32,
}

impl Default for ResetterConfig {
    fn default() -> Self {
        Self {
            boundary_buffer: 0.5,
            turn_angle: 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Meters per second.
    pub speed: f32,
    /// Degrees per second.
    pub angular_speed: f32,
    pub waypoint_min_distance: f32,
    pub waypoint_max_distance: f32,
    pub waypoint_reach_distance: f32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            angular_speed: 90.0,
            waypoint_min_distance: 4.0,
            waypoint_max_distance: 8.0,
            waypoint_reach_distance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub target_fps: f32,
    /// Step time by `1 / target_fps` instead of the wall clock.
    pub use_manual_time: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            use_manual_time: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub grid_size: usize,
    pub max_steps: u64,
    /// Keep episode start positions this far from the walls.
    pub placement_margin: f32,
    /// End the episode as soon as a reset starts.
    pub terminate_on_reset: bool,
    /// Wait between environment ticks in paced mode.
    pub wait_interval_ms: u64,
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            max_steps: 100,
            placement_margin: 0.5,
            terminate_on_reset: false,
            wait_interval_ms: 2000,
            seed: None,
        }
    }
}

impl GridConfig {
    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub none: f32,
    pub small: f32,
    pub large: f32,
    /// Replaces the action penalty whenever the user is being reset.
    pub reset: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            none: 0.0,
            small: -0.5,
            large: -1.0,
            reset: -100.0,
        }
    }
}

impl RewardConfig {
    pub fn reward(&self, steering: Steering, in_reset: bool) -> f32 {
        if in_reset {
            return self.reset;
        }
        match steering {
            Steering::None => self.none,
            Steering::SmallLeft | Steering::SmallRight => self.small,
            Steering::LargeLeft | Steering::LargeRight => self.large,
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
            }
        };
        positive("room.width", self.room.width)?;
        positive("room.depth", self.room.depth)?;
        positive("redirector.curvature_radius", self.redirector.curvature_radius)?;
        positive("resetter.turn_angle", self.resetter.turn_angle)?;
        positive("walker.speed", self.walker.speed)?;
        positive("walker.angular_speed", self.walker.angular_speed)?;
        positive("time.target_fps", self.time.target_fps)?;

        let non_negative = |name: &str, v: f32| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be non-negative, got {v}")))
            }
        };
        non_negative("walker.waypoint_min_distance", self.walker.waypoint_min_distance)?;
        non_negative("walker.waypoint_max_distance", self.walker.waypoint_max_distance)?;
        if self.walker.waypoint_min_distance > self.walker.waypoint_max_distance {
            return Err(ConfigError::Invalid(
                "walker.waypoint_min_distance exceeds waypoint_max_distance".into(),
            ));
        }
        if self.grid.grid_size == 0 {
            return Err(ConfigError::Invalid("grid.grid_size must be at least 1".into()));
        }
        if self.grid.max_steps == 0 {
            return Err(ConfigError::Invalid("grid.max_steps must be at least 1".into()));
        }
        let half_min = self.room.width.min(self.room.depth) / 2.0;
        if !(0.0..half_min).contains(&self.grid.placement_margin) {
            return Err(ConfigError::Invalid(format!(
                "grid.placement_margin must be in [0, {half_min})"
            )));
        }
        if !(0.0..half_min).contains(&self.resetter.boundary_buffer) {
            return Err(ConfigError::Invalid(format!(
                "resetter.boundary_buffer must be in [0, {half_min})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "room": { "width": 20.0 }, "grid": { "seed": 7 } }"#)
            .unwrap();
        assert_eq!(config.room.width, 20.0);
        assert_eq!(config.room.depth, 10.0);
        assert_eq!(config.grid.seed, Some(7));
        assert_eq!(config.grid.max_steps, 100);
    }

    #[test]
    fn rejects_bad_values() {
        let err = SimConfig::from_json(r#"{ "room": { "depth": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = SimConfig::from_json(r#"{ "grid": { "placement_margin": 6.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(matches!(
            SimConfig::from_json("{ not json").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn rejects_unusable_waypoint_distances() {
        let mut config = SimConfig::default();
        config.walker.waypoint_min_distance = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SimConfig::default();
        config.walker.waypoint_max_distance = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SimConfig::default();
        config.walker.waypoint_min_distance = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SimConfig::default();
        config.walker.waypoint_min_distance = 9.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn serialized_config_loads_back() {
        let mut config = SimConfig::default();
        config.grid.grid_size = 8;
        config.rewards.reset = -50.0;
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn reward_table() {
        let r = RewardConfig::default();
        assert_eq!(r.reward(Steering::None, false), 0.0);
        assert_eq!(r.reward(Steering::SmallLeft, false), -0.5);
        assert_eq!(r.reward(Steering::SmallRight, false), -0.5);
        assert_eq!(r.reward(Steering::LargeLeft, false), -1.0);
        assert_eq!(r.reward(Steering::LargeRight, false), -1.0);
        for steering in Steering::ALL {
            assert_eq!(r.reward(steering, true), -100.0);
        }
    }
}
