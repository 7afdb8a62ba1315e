//! # Cube Dodge
//!
//! Physics and collision core for a 3D cube-dodging game. A player cube moves
//! on a ground slab while enemy cubes spawn ever faster at the far end; the
//! run ends on contact or on falling off the world.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CUBE DODGE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec3.rs     - 3D vector                                 │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── body.rs     - Physics bodies and bounds                 │
//! │  ├── ground.rs   - Gravity and ground bounce                 │
//! │  ├── collision.rs- AABB collision detection                  │
//! │  ├── registry.rs - Enemy spawning and lifecycle              │
//! │  ├── session.rs  - Session state machine, best time          │
//! │  ├── input.rs    - Key snapshot and recording                │
//! │  ├── tick.rs     - Game loop                                 │
//! │  ├── events.rs   - Render/UI notifications                   │
//! │  ├── sink.rs     - Render/UI collaborator traits             │
//! │  ├── config.rs   - Tunables, JSON loading                    │
//! │  └── replay.rs   - Replay recording and verification         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Given the same config (seed included) and the same input per tick, the
//! simulation produces the same state hash:
//! - No wall-clock time; elapsed time is ticks × seconds per tick
//! - All randomness from seeded Xorshift128+
//! - Enemies are stepped and checked in spawn order
//!
//! Rendering, DOM widgets and keyboard wiring belong to the host, which
//! drives [`game::tick`] once per frame and forwards the returned events to
//! its [`game::RenderSink`] and [`game::UiSink`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec3::Vec3;
pub use core::rng::DeterministicRng;
pub use game::input::{InputFrame, InputDelta, InputBuffer};
pub use game::tick::{tick, TickResult, World};
pub use game::config::GameConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
