//! Game Configuration
//!
//! All tunable constants, loadable from JSON. Every field has a default,
//! so a config file only needs the values it changes.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec3::Vec3;
use crate::game::body::{BodyDynamics, Extents};
use crate::game::input::ConflictPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Movement and gravity constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration per tick (negative)
    pub gravity: f64,
    /// Fraction of vertical speed kept after a ground bounce
    pub ground_damping: f64,
    /// Upward velocity set by a jump
    pub jump_impulse: f64,
    /// Per-tick z-velocity increase for enemies
    pub forward_acceleration: f64,
    /// Player horizontal speed while a direction key is held
    pub player_speed: f64,
    /// Player y at or below which the run ends
    pub fatal_fall_y: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -0.002,
            ground_damping: 0.5,
            jump_impulse: 0.08,
            forward_acceleration: 0.0003,
            player_speed: 0.05,
            fatal_fall_y: -10.0,
        }
    }
}

impl PhysicsConfig {
    /// Body constants derived from this config.
    pub fn dynamics(&self) -> BodyDynamics {
        BodyDynamics {
            gravity: self.gravity,
            ground_damping: self.ground_damping,
            forward_acceleration: self.forward_acceleration,
        }
    }
}

/// Placement of a fixed or player body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Box size
    pub extents: Extents,
    /// Initial centre
    pub position: Vec3,
    /// Initial velocity
    #[serde(default)]
    pub velocity: Vec3,
}

impl BodyConfig {
    /// Default player: unit cube at the origin, drifting down.
    pub fn player() -> Self {
        Self {
            extents: Extents::UNIT,
            position: Vec3::ZERO,
            velocity: Vec3::new(0.0, -0.01, 0.0),
        }
    }

    /// Default ground: 10 x 0.5 x 40 slab below the origin.
    pub fn ground() -> Self {
        Self {
            extents: Extents::new_unchecked(10.0, 0.5, 40.0),
            position: Vec3::new(0.0, -2.0, 0.0),
            velocity: Vec3::ZERO,
        }
    }
}

/// Enemy spawn placement and cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Ticks between spawns at the start of a run
    pub initial_cadence: u32,
    /// Cadence reduction after each spawn
    pub cadence_step: u32,
    /// Cadence is never shortened below this
    pub cadence_floor: u32,
    /// Spawn x is uniform in `[x_min, x_max)`
    pub x_min: f64,
    /// Upper spawn x (exclusive)
    pub x_max: f64,
    /// Spawn height
    pub y: f64,
    /// Spawn depth (far end of the ground)
    pub z: f64,
    /// Initial z-speed is uniform in `[speed_min, speed_max)`
    pub speed_min: f64,
    /// Upper initial z-speed (exclusive)
    pub speed_max: f64,
    /// Enemy box size
    pub extents: Extents,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_cadence: 200,
            cadence_step: 20,
            cadence_floor: 20,
            x_min: -5.0,
            x_max: 5.0,
            y: 0.0,
            z: -20.0,
            speed_min: 0.05,
            speed_max: 0.15,
            extents: Extents::UNIT,
        }
    }
}

/// Behaviours on which the two shipped variants of the game disagreed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantFlags {
    /// Opposite direction keys
    pub conflict_policy: ConflictPolicy,
    /// Keep enemies in place after game over (until restart)
    pub freeze_on_death: bool,
    /// Jump only while in ground contact
    pub jump_requires_contact: bool,
    /// Step bodies and spawn enemies before the first key press.
    /// Collisions and the clock still wait for the session to start.
    pub simulate_before_start: bool,
}

impl Default for VariantFlags {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::CancelToZero,
            freeze_on_death: true,
            jump_requires_contact: true,
            simulate_before_start: false,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for enemy placement
    pub seed: u64,
    /// Simulated seconds per tick (elapsed-time clock)
    pub seconds_per_tick: f64,
    /// Gravity, damping and speeds
    pub physics: PhysicsConfig,
    /// Player start box
    pub player: BodyConfig,
    /// Ground slab
    pub ground: BodyConfig,
    /// Enemy spawning
    pub spawn: SpawnConfig,
    /// Variant behaviours
    pub variants: VariantFlags,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0BE_D0D6,
            seconds_per_tick: 1.0 / 60.0,
            physics: PhysicsConfig::default(),
            player: BodyConfig::player(),
            ground: BodyConfig::ground(),
            spawn: SpawnConfig::default(),
            variants: VariantFlags::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let s = &self.spawn;

        for (name, value) in [
            ("seconds_per_tick", self.seconds_per_tick),
            ("gravity", p.gravity),
            ("jump_impulse", p.jump_impulse),
            ("forward_acceleration", p.forward_acceleration),
            ("player_speed", p.player_speed),
            ("fatal_fall_y", p.fatal_fall_y),
            ("spawn.x_min", s.x_min),
            ("spawn.x_max", s.x_max),
            ("spawn.y", s.y),
            ("spawn.z", s.z),
            ("spawn.speed_min", s.speed_min),
            ("spawn.speed_max", s.speed_max),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if self.seconds_per_tick <= 0.0 {
            return Err(invalid(format!("seconds_per_tick must be positive, got {}", self.seconds_per_tick)));
        }
        if p.gravity >= 0.0 {
            return Err(invalid(format!("gravity must be negative, got {}", p.gravity)));
        }
        if !(0.0..=1.0).contains(&p.ground_damping) {
            return Err(invalid(format!("ground_damping must be in [0, 1], got {}", p.ground_damping)));
        }
        if s.x_min > s.x_max {
            return Err(invalid(format!("spawn x range is empty: [{}, {})", s.x_min, s.x_max)));
        }
        if s.speed_min > s.speed_max {
            return Err(invalid(format!("spawn speed range is empty: [{}, {})", s.speed_min, s.speed_max)));
        }
        if s.initial_cadence == 0 || s.cadence_floor == 0 {
            return Err(invalid("spawn cadence must be at least 1 tick".to_string()));
        }
        for (name, body) in [("player", &self.player), ("ground", &self.ground)] {
            if !body.position.is_finite() || !body.velocity.is_finite() {
                return Err(invalid(format!("{name} position and velocity must be finite")));
            }
        }
        if p.fatal_fall_y >= self.player.position.y {
            return Err(invalid(format!(
                "fatal_fall_y {} must be below the player start {}",
                p.fatal_fall_y, self.player.position.y
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
