//! Game Events
//!
//! Events generated during simulation. The render and UI collaborators
//! consume them; replay verification compares their totals.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;
use crate::game::body::{BodyId, Extents};

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Player touched an enemy
    EnemyCollision {
        /// Enemy that was hit
        enemy_id: BodyId,
    },
    /// Player dropped to the fatal height
    FellOutOfWorld {
        /// Player height when the fall was detected
        y: f64,
    },
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::EnemyCollision { enemy_id } => write!(f, "hit enemy {enemy_id}"),
            DeathCause::FellOutOfWorld { y } => write!(f, "fell out of world at y={y:.3}"),
        }
    }
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Enemy entered the scene
    EntitySpawned {
        /// New body
        body_id: BodyId,
        /// Centre at spawn
        position: Vec3,
        /// Box size
        extents: Extents,
    },

    /// Enemy left the scene
    EntityRemoved {
        /// Removed body
        body_id: BodyId,
    },

    /// First input of a fresh session
    SessionStarted,

    /// Elapsed clock advanced
    ElapsedChanged {
        /// Elapsed time of the run
        elapsed_seconds: f64,
    },

    /// Best time was committed at game over
    BestTimeChanged {
        /// New best time
        best_seconds: f64,
    },

    /// Run ended
    GameOver {
        /// Final time of the run
        elapsed_seconds: f64,
        /// What ended it
        cause: DeathCause,
    },

    /// New run began after game over
    Restarted,

    /// Camera flip key went down
    CameraFlipRequested,
}

/// A game event stamped with the frame it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame counter when the event occurred
    pub tick: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create entity spawned event.
    pub fn entity_spawned(tick: u64, body_id: BodyId, position: Vec3, extents: Extents) -> Self {
        Self::new(tick, GameEventData::EntitySpawned { body_id, position, extents })
    }

    /// Create entity removed event.
    pub fn entity_removed(tick: u64, body_id: BodyId) -> Self {
        Self::new(tick, GameEventData::EntityRemoved { body_id })
    }

    /// Create elapsed changed event.
    pub fn elapsed_changed(tick: u64, elapsed_seconds: f64) -> Self {
        Self::new(tick, GameEventData::ElapsedChanged { elapsed_seconds })
    }

    /// Create best time changed event.
    pub fn best_time_changed(tick: u64, best_seconds: f64) -> Self {
        Self::new(tick, GameEventData::BestTimeChanged { best_seconds })
    }

    /// Create game over event.
    pub fn game_over(tick: u64, elapsed_seconds: f64, cause: DeathCause) -> Self {
        Self::new(tick, GameEventData::GameOver { elapsed_seconds, cause })
    }

    /// Check if this is a game over event.
    pub fn is_game_over(&self) -> bool {
        matches!(self.data, GameEventData::GameOver { .. })
    }
}
