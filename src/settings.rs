//! Game configuration
//!
//! Loaded once at startup by the runner and handed to [`crate::sim::World`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Startup configuration for a simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ceiling for bounded planet radii
    pub max_planet_radius: f32,
    /// How many subscriber planets may be spawned
    pub number_of_subs_players: usize,
    /// Arena diameter (the arena radius is half of this)
    pub arena_scale: f32,
    /// Planet growth rate (units per second)
    pub growth_rate: f32,
    /// Base move speed for combatants
    pub move_speed: f32,
    /// Seconds of rewind history
    pub record_seconds: f32,
    /// Fixed timestep (seconds)
    pub fixed_dt: f32,
    /// RNG seed
    pub seed: u64,
    /// Reset the round automatically when the black hole finishes growing
    pub reset_on_collapse: bool,
    /// Linear drag applied by the reference integrator (human planets use 0)
    pub linear_drag: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_planet_radius: 100.0,
            number_of_subs_players: 10,
            arena_scale: 1000.0,
            growth_rate: PLANET_GROWTH_RATE,
            move_speed: MOVE_SPEED,
            record_seconds: RECORD_SECONDS,
            fixed_dt: SIM_DT,
            seed: 42,
            reset_on_collapse: false,
            linear_drag: 1.0,
        }
    }
}

impl GameConfig {
    /// Arena radius derived from the scale
    pub fn arena_radius(&self) -> f32 {
        self.arena_scale / 2.0
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if !(self.fixed_dt > 0.0) {
            return invalid("fixed_dt", "must be positive");
        }
        if !(self.max_planet_radius > 0.0) {
            return invalid("max_planet_radius", "must be positive");
        }
        if !(self.arena_scale > 0.0) {
            return invalid("arena_scale", "must be positive");
        }
        if self.growth_rate < 0.0 {
            return invalid("growth_rate", "must not be negative");
        }
        if self.record_seconds < 0.0 {
            return invalid("record_seconds", "must not be negative");
        }
        if self.linear_drag < 0.0 {
            return invalid("linear_drag", "must not be negative");
        }
        if self.arena_radius() - BLACK_HOLE_WALL_MARGIN * self.max_planet_radius
            < BLACK_HOLE_SEED_RADIUS
        {
            log::warn!(
                "Arena radius {} leaves no room for the black hole to grow (max planet radius {})",
                self.arena_radius(),
                self.max_planet_radius
            );
        }
        Ok(())
    }
}
