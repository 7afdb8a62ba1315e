//! Physics Bodies
//!
//! Axis-aligned boxes with position, velocity and per-body flags.
//! A body carries no rendering state; the renderer keys its own handles
//! by [`BodyId`].

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec3::Vec3;
use crate::game::ground::{resolve_ground, GroundContact};

// =============================================================================
// BODY ID
// =============================================================================

/// Identity of a body, shared with the render collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// The player body.
    pub const PLAYER: BodyId = BodyId(0);
    /// The fixed ground body.
    pub const GROUND: BodyId = BodyId(1);
    /// First id handed out to spawned enemies.
    pub const FIRST_ENEMY: u32 = 2;
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Box axis, for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// x extent
    Width,
    /// y extent
    Height,
    /// z extent
    Depth,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Width => "width",
            Axis::Height => "height",
            Axis::Depth => "depth",
        };
        f.write_str(name)
    }
}

/// Body construction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    /// An extent was zero, negative or NaN.
    #[error("body {axis} must be positive and finite, got {value}")]
    NonPositiveExtent {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: f64,
    },
}

// =============================================================================
// EXTENTS & BOUNDS
// =============================================================================

/// Box dimensions. Always strictly positive once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExtents", into = "RawExtents")]
pub struct Extents {
    width: f64,
    height: f64,
    depth: f64,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawExtents {
    width: f64,
    height: f64,
    depth: f64,
}

impl TryFrom<RawExtents> for Extents {
    type Error = BodyError;

    fn try_from(raw: RawExtents) -> Result<Self, Self::Error> {
        Extents::new(raw.width, raw.height, raw.depth)
    }
}

impl From<Extents> for RawExtents {
    fn from(e: Extents) -> Self {
        RawExtents {
            width: e.width,
            height: e.height,
            depth: e.depth,
        }
    }
}

impl Extents {
    /// Create extents, rejecting non-positive or non-finite sizes.
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self, BodyError> {
        for (axis, value) in [(Axis::Width, width), (Axis::Height, height), (Axis::Depth, depth)] {
            if value <= 0.0 || !value.is_finite() {
                return Err(BodyError::NonPositiveExtent { axis, value });
            }
        }
        Ok(Self { width, height, depth })
    }

    /// Unit cube (player and enemies).
    pub const UNIT: Extents = Extents::new_unchecked(1.0, 1.0, 1.0);

    /// For literal defaults only; callers guarantee positive sizes.
    pub(crate) const fn new_unchecked(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth }
    }

    /// Size along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Size along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Size along z.
    #[inline]
    pub fn depth(&self) -> f64 {
        self.depth
    }
}

/// Axis-aligned bounds derived from a body's centre and extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum x
    pub left: f64,
    /// Maximum x
    pub right: f64,
    /// Minimum y
    pub bottom: f64,
    /// Maximum y
    pub top: f64,
    /// Minimum z
    pub back: f64,
    /// Maximum z
    pub front: f64,
}

impl Bounds {
    /// Bounds of a box centred on `center`.
    #[inline]
    pub fn from_center(center: Vec3, extents: &Extents) -> Self {
        let hw = extents.width / 2.0;
        let hh = extents.height / 2.0;
        let hd = extents.depth / 2.0;
        Self {
            left: center.x - hw,
            right: center.x + hw,
            bottom: center.y - hh,
            top: center.y + hh,
            back: center.z - hd,
            front: center.z + hd,
        }
    }
}

// =============================================================================
// DYNAMICS
// =============================================================================

/// Per-body physical constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDynamics {
    /// Added to `velocity.y` every step (negative)
    pub gravity: f64,
    /// Fraction of vertical speed kept on a ground bounce
    pub ground_damping: f64,
    /// Added to `velocity.z` every step while forward acceleration is on
    pub forward_acceleration: f64,
}

impl Default for BodyDynamics {
    fn default() -> Self {
        Self {
            gravity: -0.002,
            ground_damping: 0.5,
            forward_acceleration: 0.0003,
        }
    }
}

// =============================================================================
// PHYSICS BODY
// =============================================================================

/// A box-shaped body stepped once per tick.
///
/// `position` is private so the cached [`Bounds`] can never fall out of
/// sync with it; every mutation goes through a method that recomputes them.
/// Bounds are not serialized and are rebuilt on deserialize.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "RawBody", into = "RawBody")]
pub struct PhysicsBody {
    id: BodyId,
    extents: Extents,
    position: Vec3,
    bounds: Bounds,

    /// Current velocity, in units per tick
    pub velocity: Vec3,

    dynamics: BodyDynamics,
    forward_acceleration_enabled: bool,
    can_jump: bool,
}

#[derive(Clone, Serialize, Deserialize)]
struct RawBody {
    id: BodyId,
    extents: Extents,
    position: Vec3,
    velocity: Vec3,
    dynamics: BodyDynamics,
    forward_acceleration_enabled: bool,
    can_jump: bool,
}

impl From<RawBody> for PhysicsBody {
    fn from(raw: RawBody) -> Self {
        let mut body = PhysicsBody::new(raw.id, raw.extents, raw.position, raw.velocity, raw.dynamics);
        body.forward_acceleration_enabled = raw.forward_acceleration_enabled;
        body.can_jump = raw.can_jump;
        body
    }
}

impl From<PhysicsBody> for RawBody {
    fn from(body: PhysicsBody) -> Self {
        RawBody {
            id: body.id,
            extents: body.extents,
            position: body.position,
            velocity: body.velocity,
            dynamics: body.dynamics,
            forward_acceleration_enabled: body.forward_acceleration_enabled,
            can_jump: body.can_jump,
        }
    }
}

impl PhysicsBody {
    /// Create a body at `position`.
    pub fn new(id: BodyId, extents: Extents, position: Vec3, velocity: Vec3, dynamics: BodyDynamics) -> Self {
        Self {
            id,
            extents,
            position,
            bounds: Bounds::from_center(position, &extents),
            velocity,
            dynamics,
            forward_acceleration_enabled: false,
            can_jump: true,
        }
    }

    /// Enable ever-increasing z-velocity (enemies).
    pub fn with_forward_acceleration(mut self) -> Self {
        self.forward_acceleration_enabled = true;
        self
    }

    /// Body identity.
    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Box size.
    #[inline]
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Centre of the box.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Bounds for the current position.
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Physical constants.
    #[inline]
    pub fn dynamics(&self) -> &BodyDynamics {
        &self.dynamics
    }

    /// Whether a gated jump would succeed now.
    #[inline]
    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    /// Whether z-velocity grows every step.
    #[inline]
    pub fn forward_acceleration_enabled(&self) -> bool {
        self.forward_acceleration_enabled
    }

    /// Move the body to `position` (restart), keeping its identity.
    pub fn reposition(&mut self, position: Vec3) {
        self.position = position;
        self.update_bounds();
    }

    /// Apply the jump impulse.
    ///
    /// With `requires_contact`, the jump only happens while the body is
    /// eligible. A successful jump spends eligibility until the next
    /// ground contact.
    pub fn try_jump(&mut self, impulse: f64, requires_contact: bool) -> bool {
        if requires_contact && !self.can_jump {
            return false;
        }
        self.velocity.y = impulse;
        self.can_jump = false;
        true
    }

    /// Horizontal integration: forward acceleration, then x/z advance.
    pub fn integrate(&mut self) {
        if self.forward_acceleration_enabled {
            self.velocity.z += self.dynamics.forward_acceleration;
        }

        self.position.x += self.velocity.x;
        self.position.z += self.velocity.z;

        self.update_bounds();
    }

    /// Gravity plus ground response against `ground`.
    pub fn apply_gravity(&mut self, ground: &PhysicsBody) -> GroundContact {
        resolve_ground(self, ground)
    }

    /// One full step: [`integrate`](Self::integrate) then
    /// [`apply_gravity`](Self::apply_gravity).
    pub fn update(&mut self, ground: &PhysicsBody) -> GroundContact {
        self.integrate();
        self.apply_gravity(ground)
    }

    pub(crate) fn advance_y(&mut self, dy: f64) {
        self.position.y += dy;
        self.update_bounds();
    }

    pub(crate) fn set_can_jump(&mut self, can_jump: bool) {
        self.can_jump = can_jump;
    }

    #[inline]
    fn update_bounds(&mut self) {
        self.bounds = Bounds::from_center(self.position, &self.extents);
    }
}

// =============================================================================
// TESTS
// =============================================================================
