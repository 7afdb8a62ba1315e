//! Game Logic Module
//!
//! All game simulation code. Deterministic for a given seed and input stream.
//!
//! ## Module Structure
//!
//! - `body`: Physics bodies, extents and bounds
//! - `ground`: Gravity and ground bounce
//! - `collision`: AABB checks and the fall threshold
//! - `registry`: Enemy spawning on a shrinking cadence
//! - `session`: NotStarted / Running / Over state machine and best time
//! - `input`: Per-tick key snapshot and input recording
//! - `tick`: The game loop
//! - `events`: Notifications for render and UI
//! - `sink`: Render and UI collaborator traits
//! - `config`: Tunables and JSON loading
//! - `replay`: Recording and deterministic verification

pub mod body;
pub mod ground;
pub mod collision;
pub mod registry;
pub mod session;
pub mod input;
pub mod tick;
pub mod events;
pub mod sink;
pub mod config;
pub mod replay;

// Re-export key types
pub use body::{BodyError, BodyId, Bounds, Extents, PhysicsBody};
pub use config::{ConfigError, GameConfig};
pub use events::{DeathCause, GameEvent, GameEventData};
pub use input::{ConflictPolicy, InputBuffer, InputFrame};
pub use registry::EntityRegistry;
pub use session::{GameSession, SessionError, SessionPhase};
pub use sink::{dispatch_events, RecordingSink, RenderSink, UiSink};
pub use tick::{tick, TickResult, World};
