//! Replay Recording
//!
//! Records everything needed to re-run a play session deterministically:
//! the config (seed included), every tick's input, and where restarts
//! happened. Hashes are checked at fixed checkpoints and at the end.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::hash::StateHash;
use crate::game::config::{ConfigError, GameConfig};
use crate::game::events::GameEvent;
use crate::game::input::{InputBuffer, InputFrame};
use crate::game::session::SessionError;
use crate::game::tick::{tick, TickResult, World};

/// Current replay format version.
pub const REPLAY_VERSION: u8 = 1;

/// Checkpoint interval in ticks (every 10 seconds at 60Hz).
pub const CHECKPOINT_INTERVAL: u64 = 600;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Recorded config is invalid.
    #[error("replay config rejected: {0}")]
    Config(#[from] ConfigError),

    /// Recorded restart was not legal at that point.
    #[error("replay diverged: {0}")]
    Session(#[from] SessionError),

    /// Log could not be (de)serialized.
    #[error("replay log is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Log was written by another format version.
    #[error("replay version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version.
        expected: u8,
        /// Version found in the log.
        got: u8,
    },

    /// Replayed state differs from the recording.
    #[error("state hash mismatch after {step} ticks: expected {expected}, got {actual}")]
    HashMismatch {
        /// Ticks replayed when the mismatch was found
        step: u64,
        /// Hex hash from the log
        expected: String,
        /// Hex hash from the replay
        actual: String,
    },
}

/// State hash recorded mid-session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Ticks recorded before this hash was taken
    pub step: u64,
    /// Hex-encoded state hash
    pub state_hash: String,
}

/// A recorded play session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Format version.
    pub version: u8,

    /// Config the world was built from.
    pub config: GameConfig,

    /// One input per tick call.
    pub inputs: InputBuffer,

    /// Tick counts at which the host restarted, ascending.
    pub restarts: Vec<u64>,

    /// Periodic state hashes.
    pub checkpoints: Vec<Checkpoint>,

    /// Hex-encoded hash after the last tick.
    pub final_hash: String,
}

impl ReplayLog {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total tick calls recorded.
    pub fn tick_count(&self) -> u64 {
        self.inputs.len
    }
}

// =============================================================================
// RECORDER
// =============================================================================

/// Drives a [`World`] and records what it was fed.
#[derive(Debug)]
pub struct ReplayRecorder {
    world: World,
    inputs: InputBuffer,
    restarts: Vec<u64>,
    checkpoints: Vec<Checkpoint>,
}

impl ReplayRecorder {
    /// Create a recorder around a fresh world.
    pub fn new(config: GameConfig) -> Result<Self, ReplayError> {
        Ok(Self {
            world: World::new(config)?,
            inputs: InputBuffer::new(),
            restarts: Vec::new(),
            checkpoints: Vec::new(),
        })
    }

    /// The world being recorded.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run and record one tick.
    pub fn tick(&mut self, input: InputFrame) -> TickResult {
        self.inputs.push(input);
        let result = tick(&mut self.world, &input);

        let step = self.inputs.len;
        if step % CHECKPOINT_INTERVAL == 0 {
            self.checkpoints.push(Checkpoint {
                step,
                state_hash: hex::encode(self.world.compute_hash()),
            });
        }

        result
    }

    /// Restart the world and record where it happened.
    pub fn restart(&mut self) -> Result<Vec<GameEvent>, ReplayError> {
        let events = self.world.restart()?;
        self.restarts.push(self.inputs.len);
        Ok(events)
    }

    /// Seal the recording with the final hash.
    pub fn finish(self) -> ReplayLog {
        let final_hash = hex::encode(self.world.compute_hash());
        info!(
            ticks = self.inputs.len,
            restarts = self.restarts.len(),
            final_hash = %final_hash,
            "replay recorded"
        );

        ReplayLog {
            version: REPLAY_VERSION,
            config: self.world.config().clone(),
            inputs: self.inputs,
            restarts: self.restarts,
            checkpoints: self.checkpoints,
            final_hash,
        }
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Re-run a log, checking every checkpoint on the way.
///
/// Returns the final world; the final hash is not compared here.
pub fn replay(log: &ReplayLog) -> Result<World, ReplayError> {
    if log.version != REPLAY_VERSION {
        return Err(ReplayError::VersionMismatch {
            expected: REPLAY_VERSION,
            got: log.version,
        });
    }

    let mut world = World::new(log.config.clone())?;
    let mut restarts = log.restarts.iter().copied().peekable();
    let mut checkpoints = log.checkpoints.iter().peekable();

    for (step, input) in log.inputs.iter().enumerate() {
        let step = step as u64;
        while restarts.next_if(|&at| at == step).is_some() {
            world.restart()?;
        }

        tick(&mut world, &input);

        let done = step + 1;
        if let Some(checkpoint) = checkpoints.next_if(|c| c.step == done) {
            check_hash(done, &checkpoint.state_hash, &world.compute_hash())?;
            debug!(step = done, "checkpoint verified");
        }
    }

    // Restarts recorded after the last tick
    while restarts.next().is_some() {
        world.restart()?;
    }

    Ok(world)
}

/// Re-run a log and compare the final hash.
pub fn verify(log: &ReplayLog) -> Result<StateHash, ReplayError> {
    let world = replay(log)?;
    let hash = world.compute_hash();
    check_hash(log.tick_count(), &log.final_hash, &hash)?;
    info!(ticks = log.tick_count(), "replay verified");
    Ok(hash)
}

fn check_hash(step: u64, expected: &str, actual: &StateHash) -> Result<(), ReplayError> {
    let actual = hex::encode(actual);
    if expected != actual {
        return Err(ReplayError::HashMismatch {
            step,
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}
