//! Collision Detection
//!
//! Binary AABB overlap between a moving body and another box.
//! Brute-force pairwise: the enemy population stays in the dozens, so
//! there is no broad phase. Past a few thousand bodies this would need
//! spatial partitioning.

use crate::game::body::{BodyId, PhysicsBody};

/// Check if `moving` overlaps `other` on all three axes.
///
/// The y-axis test uses the moving body's predicted bottom
/// (`bottom + velocity.y`), so the check looks one tick ahead. The
/// predicate is asymmetric: always pass the moving body first.
#[inline]
pub fn boxes_overlap(moving: &PhysicsBody, other: &PhysicsBody) -> bool {
    let a = moving.bounds();
    let b = other.bounds();

    let x = a.right >= b.left && a.left <= b.right;
    let y = a.bottom + moving.velocity.y <= b.top && a.top >= b.bottom;
    let z = a.front >= b.back && a.back <= b.front;

    x && y && z
}

/// First enemy (in spawn order) that the player overlaps.
pub fn first_enemy_hit<'a, I>(player: &PhysicsBody, enemies: I) -> Option<BodyId>
where
    I: IntoIterator<Item = &'a PhysicsBody>,
{
    enemies
        .into_iter()
        .find(|enemy| boxes_overlap(player, enemy))
        .map(PhysicsBody::id)
}

/// Check if the player has dropped to or below the fatal height.
#[inline]
pub fn fell_out_of_world(player: &PhysicsBody, fatal_y: f64) -> bool {
    player.position().y <= fatal_y
}
