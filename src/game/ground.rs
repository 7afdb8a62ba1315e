//! Ground Resolution
//!
//! Gravity and the bounce-or-fall response of a body against the fixed
//! ground box.

use serde::{Serialize, Deserialize};

use crate::game::body::PhysicsBody;
use crate::game::collision::boxes_overlap;

/// Outcome of one gravity step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundContact {
    /// Predicted position touches the ground; body bounced in place.
    Contact,
    /// No contact; body fell by its vertical velocity.
    Airborne,
}

/// Apply gravity to `body` and resolve it against `ground`.
///
/// The overlap test runs on the predicted bottom (`bottom + velocity.y`)
/// before anything is committed. On contact the vertical velocity is damped
/// and reversed and `position.y` is left untouched, so the body never sinks
/// into the ground.
pub fn resolve_ground(body: &mut PhysicsBody, ground: &PhysicsBody) -> GroundContact {
    let dynamics = *body.dynamics();
    body.velocity.y += dynamics.gravity;

    if boxes_overlap(body, ground) {
        body.velocity.y = -(body.velocity.y * dynamics.ground_damping);
        body.set_can_jump(true);
        GroundContact::Contact
    } else {
        let dy = body.velocity.y;
        body.advance_y(dy);
        body.set_can_jump(false);
        GroundContact::Airborne
    }
}
