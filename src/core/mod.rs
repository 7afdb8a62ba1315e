//! Core deterministic primitives.
//!
//! Vector math, seeded randomness and state hashing. Nothing in here knows
//! about the game rules.

pub mod vec3;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec3::Vec3;
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
