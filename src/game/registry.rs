//! Enemy Registry
//!
//! Owns the live enemy bodies, spawns new ones on a shrinking cadence,
//! and removes them on restart.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::game::body::{BodyDynamics, BodyId, PhysicsBody};
use crate::game::config::SpawnConfig;

// =============================================================================
// SPAWN CADENCE
// =============================================================================

/// Ticks between spawn attempts.
///
/// Non-increasing within a run: each spawn shortens it by `step` until it
/// reaches `floor`. Never below 1, so the modulus check is always defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCadence", into = "RawCadence")]
pub struct SpawnCadence {
    current: u32,
    initial: u32,
    step: u32,
    floor: u32,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawCadence {
    current: u32,
    initial: u32,
    step: u32,
    floor: u32,
}

impl From<RawCadence> for SpawnCadence {
    fn from(raw: RawCadence) -> Self {
        let mut cadence = SpawnCadence::new(raw.initial, raw.step, raw.floor);
        cadence.current = raw.current.max(1);
        cadence
    }
}

impl From<SpawnCadence> for RawCadence {
    fn from(c: SpawnCadence) -> Self {
        RawCadence {
            current: c.current,
            initial: c.initial,
            step: c.step,
            floor: c.floor,
        }
    }
}

impl SpawnCadence {
    /// Create a cadence starting at `initial`.
    pub fn new(initial: u32, step: u32, floor: u32) -> Self {
        let floor = floor.max(1);
        let initial = initial.max(1);
        Self {
            current: initial,
            initial,
            step,
            floor,
        }
    }

    /// Current ticks between spawns.
    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Check whether `frame` is a spawn tick.
    #[inline]
    pub fn is_due(&self, frame: u64) -> bool {
        frame % u64::from(self.current) == 0
    }

    /// Shorten after a spawn. Only applies while above the floor.
    pub fn shorten(&mut self) {
        if self.current > self.floor {
            self.current = self.current.saturating_sub(self.step).max(self.floor);
        }
    }

    /// Back to the initial cadence (restart).
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl From<&SpawnConfig> for SpawnCadence {
    fn from(config: &SpawnConfig) -> Self {
        Self::new(config.initial_cadence, config.cadence_step, config.cadence_floor)
    }
}

// =============================================================================
// ENTITY REGISTRY
// =============================================================================

/// Live enemy bodies in spawn order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityRegistry {
    enemies: Vec<PhysicsBody>,
    cadence: SpawnCadence,
    spawn: SpawnConfig,
    dynamics: BodyDynamics,
    next_id: u32,
    frozen: bool,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new(spawn: SpawnConfig, dynamics: BodyDynamics) -> Self {
        Self {
            enemies: Vec::new(),
            cadence: SpawnCadence::from(&spawn),
            spawn,
            dynamics,
            next_id: BodyId::FIRST_ENEMY,
            frozen: false,
        }
    }

    /// Spawn one enemy at the far end of the ground.
    ///
    /// Returns the new body so the caller can hand it to the renderer.
    pub fn spawn(&mut self, rng: &mut DeterministicRng) -> &PhysicsBody {
        let s = &self.spawn;
        let x = rng.next_f64_range(s.x_min, s.x_max);
        let speed = rng.next_f64_range(s.speed_min, s.speed_max);

        let id = BodyId(self.next_id);
        self.next_id += 1;

        let enemy = PhysicsBody::new(
            id,
            s.extents,
            Vec3::new(x, s.y, s.z),
            Vec3::new(0.0, 0.0, speed),
            self.dynamics,
        )
        .with_forward_acceleration();

        debug!(enemy = %id, x, speed, "spawned enemy");

        self.enemies.push(enemy);
        &self.enemies[self.enemies.len() - 1]
    }

    /// Spawn if `frame` falls on the cadence, then shorten the cadence.
    pub fn maybe_spawn(&mut self, frame: u64, rng: &mut DeterministicRng) -> Option<&PhysicsBody> {
        if self.frozen || !self.cadence.is_due(frame) {
            return None;
        }

        let before = self.cadence.current();
        self.cadence.shorten();
        if self.cadence.current() != before {
            debug!(from = before, to = self.cadence.current(), "spawn cadence shortened");
        }

        Some(self.spawn(rng))
    }

    /// Step every enemy against the ground.
    pub fn step_all(&mut self, ground: &PhysicsBody) {
        if self.frozen {
            return;
        }
        for enemy in &mut self.enemies {
            enemy.update(ground);
        }
    }

    /// Freeze the scene at game over.
    ///
    /// Enemies stay registered (and rendered) until [`restart`](Self::restart);
    /// they are no longer stepped and nothing new spawns.
    pub fn clear(&mut self) {
        self.frozen = true;
    }

    /// Remove every enemy, returning their ids in spawn order.
    pub fn despawn_all(&mut self) -> Vec<BodyId> {
        self.enemies.drain(..).map(|e| e.id()).collect()
    }

    /// Remove every enemy and reset the cadence for a new run.
    pub fn restart(&mut self) -> Vec<BodyId> {
        let removed = self.despawn_all();
        self.cadence.reset();
        self.frozen = false;
        debug!(removed = removed.len(), "registry restarted");
        removed
    }

    /// Iterate enemies in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &PhysicsBody> {
        self.enemies.iter()
    }

    /// Enemies as a slice.
    pub fn as_slice(&self) -> &[PhysicsBody] {
        &self.enemies
    }

    /// Look up an enemy by id.
    pub fn get(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Number of live enemies.
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Check if no enemies are live.
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Frozen by [`clear`](Self::clear) until restart.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Current spawn cadence.
    pub fn cadence(&self) -> &SpawnCadence {
        &self.cadence
    }

    /// Mutable enemy access for tests that stage collisions.
    #[cfg(test)]
    pub(crate) fn enemies_mut(&mut self) -> &mut Vec<PhysicsBody> {
        &mut self.enemies
    }
}
