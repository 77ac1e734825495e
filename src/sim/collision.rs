//! Narrow-phase checks between the runner and spawned entities
//!
//! Physics only moves bodies; whether a touch is lethal or a pickup is
//! decided here. The runner is a circle, obstacles are boxes, power-ups are
//! circles.

use std::collections::VecDeque;

use glam::Vec2;

use super::entity::{Aabb, Collectible, Entity, Obstacle, PowerUpKind};
use super::physics::{EntityId, PhysicsWorld};
use super::runner::Runner;
use crate::tuning::Tuning;

/// Hitbox shaping for runner-vs-obstacle tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxParams {
    /// Sub-unity multiplier on the physical radius
    pub forgiveness: f32,
    /// Added to the shrunk radius (meters)
    pub buffer: f32,
}

impl HitboxParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            forgiveness: tuning.hitbox_forgiveness,
            buffer: tuning.collision_buffer,
        }
    }

    /// Distance from the runner center at which an obstacle is touched
    #[inline]
    pub fn reach(&self, physical_radius: f32) -> f32 {
        physical_radius * self.forgiveness + self.buffer
    }
}

/// What the resolver found this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Obstacle that killed the runner
    pub killed_by: Option<EntityId>,
    /// Power-ups picked up and already applied
    pub collected: Vec<PowerUpKind>,
}

/// Circle vs box, touching counts as a hit
#[inline]
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    let closest = aabb.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Circle vs circle, strict overlap
#[inline]
pub fn circle_circle_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// First obstacle (in container order) the runner touches
pub fn find_lethal_obstacle<'a>(
    center: Vec2,
    reach: f32,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
) -> Option<EntityId> {
    obstacles
        .into_iter()
        .find(|obstacle| {
            let aabb = Aabb::new(obstacle.position(), obstacle.half_extents());
            circle_aabb_overlap(center, reach, &aabb)
        })
        .map(|obstacle| obstacle.id())
}

/// Remove every collectible the runner overlaps, releasing its body.
/// Returns the kinds collected, in container order.
pub fn take_collectibles(
    center: Vec2,
    radius: f32,
    collectibles: &mut VecDeque<Collectible>,
    physics: &mut PhysicsWorld,
) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    let mut i = 0;
    while i < collectibles.len() {
        let hit = circle_circle_overlap(
            center,
            radius,
            collectibles[i].position(),
            collectibles[i].radius(),
        );
        if !hit {
            i += 1;
            continue;
        }
        if let Some(collectible) = collectibles.remove(i) {
            collected.push(collectible.kind());
            collectible.despawn(physics);
        }
    }
    collected
}

/// Run both checks for one frame.
///
/// Nothing happens once the runner is dead: no second death, no pickups.
pub fn resolve(
    runner: &mut Runner,
    physics: &mut PhysicsWorld,
    obstacles: &VecDeque<Obstacle>,
    collectibles: &mut VecDeque<Collectible>,
    hitbox: HitboxParams,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    if runner.is_dead() {
        return outcome;
    }

    let center = runner.position(physics);
    let radius = runner.radius();

    if let Some(id) = find_lethal_obstacle(center, hitbox.reach(radius), obstacles) {
        runner.kill();
        outcome.killed_by = Some(id);
        return outcome;
    }

    outcome.collected = take_collectibles(center, radius, collectibles, physics);
    for &kind in &outcome.collected {
        runner.activate_power_up(kind);
    }
    outcome
}
