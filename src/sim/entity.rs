//! Static world entities and the shared entity interface
//!
//! The entity set is closed: `Runner`, `GroundSegment`, `Obstacle` and
//! `Collectible` are the only implementers of [`Entity`]. Each owns exactly
//! one physics body, released through [`Entity::despawn`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{BodyHandle, Category, EntityId, PhysicsWorld};
use crate::assets;
use crate::{m_to_px, vec_px_to_m};

mod private {
    pub trait Sealed {}
}

impl private::Sealed for super::runner::Runner {}
impl private::Sealed for GroundSegment {}
impl private::Sealed for Obstacle {}
impl private::Sealed for Collectible {}

/// Axis-aligned box in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Closest point inside the box to `p` (per-axis clamp)
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

pub trait Entity: private::Sealed {
    fn id(&self) -> EntityId;

    fn body(&self) -> BodyHandle;

    /// Per-frame update. Static entities have nothing to do.
    fn update(&mut self, _physics: &mut PhysicsWorld, _dt: f32, _score: u32) {}

    /// Current extent in meters
    fn bounds(&self, physics: &PhysicsWorld) -> Aabb;

    /// Right edge in world pixels
    fn right_edge_px(&self, physics: &PhysicsWorld) -> f32 {
        m_to_px(self.bounds(physics).max().x)
    }

    /// Destroy the entity and release its body
    fn despawn(self, physics: &mut PhysicsWorld)
    where
        Self: Sized,
    {
        physics.remove_body(self.body());
    }
}

/// A static strip of ground
#[derive(Debug, Clone)]
pub struct GroundSegment {
    id: EntityId,
    body: BodyHandle,
    left_px: f32,
    right_px: f32,
    height_px: f32,
    center: Vec2,
}

impl GroundSegment {
    /// Create a segment whose left edge is at `left_px` and whose top is the
    /// ground surface (`screen_height - height_px`)
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: EntityId,
        left_px: f32,
        width_px: f32,
        height_px: f32,
        screen_height: f32,
    ) -> Self {
        let center_px = Vec2::new(left_px + width_px / 2.0, screen_height - height_px / 2.0);
        let center = vec_px_to_m(center_px);
        let half = vec_px_to_m(Vec2::new(width_px, height_px) / 2.0);
        let body = physics.create_static_box(id, center, half, Category::GROUND, false);

        Self {
            id,
            body,
            left_px,
            right_px: left_px + width_px,
            height_px,
            center,
        }
    }

    pub fn left_edge_px(&self) -> f32 {
        self.left_px
    }

    pub fn right_edge_x(&self) -> f32 {
        self.right_px
    }

    pub fn width_px(&self) -> f32 {
        self.right_px - self.left_px
    }

    pub fn height_px(&self) -> f32 {
        self.height_px
    }
}

impl Entity for GroundSegment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn bounds(&self, _physics: &PhysicsWorld) -> Aabb {
        Aabb::new(
            self.center,
            vec_px_to_m(Vec2::new(self.width_px(), self.height_px) / 2.0),
        )
    }

    fn right_edge_px(&self, _physics: &PhysicsWorld) -> f32 {
        self.right_px
    }
}

/// Obstacle shapes, each demanding a different evasion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Single jump clears it
    Short,
    /// Needs more than one jump
    Tall,
    /// Needs well-timed jumps
    Wide,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Short, ObstacleKind::Tall, ObstacleKind::Wide];

    /// Texture keys this kind may be drawn with
    pub fn skins(&self) -> &'static [&'static str] {
        match self {
            ObstacleKind::Short => assets::SHORT_OBSTACLE_SKINS,
            ObstacleKind::Tall => assets::TALL_OBSTACLE_SKINS,
            ObstacleKind::Wide => assets::WIDE_OBSTACLE_SKINS,
        }
    }
}

/// A lethal static sensor standing on the ground
#[derive(Debug, Clone)]
pub struct Obstacle {
    id: EntityId,
    body: BodyHandle,
    kind: ObstacleKind,
    width_px: f32,
    height_px: f32,
    center_px: Vec2,
    scored: bool,
    skin: &'static str,
}

impl Obstacle {
    /// Create an obstacle centered at (`x_px`, `y_px`)
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: EntityId,
        kind: ObstacleKind,
        x_px: f32,
        y_px: f32,
        width_px: f32,
        height_px: f32,
        skin: &'static str,
    ) -> Self {
        let center_px = Vec2::new(x_px, y_px);
        let half = vec_px_to_m(Vec2::new(width_px, height_px) / 2.0);
        let body = physics.create_static_box(
            id,
            vec_px_to_m(center_px),
            half,
            Category::OBSTACLE,
            true,
        );

        Self {
            id,
            body,
            kind,
            width_px,
            height_px,
            center_px,
            scored: false,
            skin,
        }
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn skin(&self) -> &'static str {
        self.skin
    }

    /// Center in meters
    pub fn position(&self) -> Vec2 {
        vec_px_to_m(self.center_px)
    }

    pub fn position_px(&self) -> Vec2 {
        self.center_px
    }

    pub fn width_px(&self) -> f32 {
        self.width_px
    }

    pub fn height_px(&self) -> f32 {
        self.height_px
    }

    pub fn half_extents(&self) -> Vec2 {
        vec_px_to_m(Vec2::new(self.width_px, self.height_px) / 2.0)
    }

    pub fn right_edge_x(&self) -> f32 {
        self.center_px.x + self.width_px / 2.0
    }

    pub fn is_scored(&self) -> bool {
        self.scored
    }

    /// Flag as scored. Returns false if it already was.
    pub fn mark_scored(&mut self) -> bool {
        !std::mem::replace(&mut self.scored, true)
    }
}

impl Entity for Obstacle {
    fn id(&self) -> EntityId {
        self.id
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn bounds(&self, _physics: &PhysicsWorld) -> Aabb {
        Aabb::new(self.position(), self.half_extents())
    }

    fn right_edge_px(&self, _physics: &PhysicsWorld) -> f32 {
        self.right_edge_x()
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// One more jump than usual while active
    ExtraJump,
    /// Passed obstacles are worth two points while active
    DoubleScore,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::ExtraJump, PowerUpKind::DoubleScore];
}

/// A power-up pickup
#[derive(Debug, Clone)]
pub struct Collectible {
    id: EntityId,
    body: BodyHandle,
    kind: PowerUpKind,
    center: Vec2,
    radius: f32,
}

impl Collectible {
    /// Create a power-up centered at `center` (meters)
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: EntityId,
        kind: PowerUpKind,
        center: Vec2,
        radius: f32,
    ) -> Self {
        let body = physics.create_sensor_ball(id, center, radius, Category::COLLECTIBLE);
        Self {
            id,
            body,
            kind,
            center,
            radius,
        }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Entity for Collectible {
    fn id(&self) -> EntityId {
        self.id
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn bounds(&self, _physics: &PhysicsWorld) -> Aabb {
        Aabb::new(self.center, Vec2::splat(self.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_closest_point() {
        let aabb = Aabb::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.5));
        assert_eq!(aabb.closest_point(Vec2::new(-3.0, 1.2)), Vec2::new(0.0, 1.2));
        assert_eq!(aabb.closest_point(Vec2::new(1.5, 1.0)), Vec2::new(1.5, 1.0));
        assert_eq!(aabb.closest_point(Vec2::new(5.0, 5.0)), Vec2::new(2.0, 1.5));
    }

    #[test]
    fn test_ground_segment_edges() {
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let seg = GroundSegment::spawn(&mut physics, EntityId(1), 800.0, 800.0, 40.0, 720.0);
        assert_eq!(seg.left_edge_px(), 800.0);
        assert_eq!(seg.right_edge_x(), 1600.0);
        let bounds = seg.bounds(&physics);
        assert!((m_to_px(bounds.min().y) - 680.0).abs() < 1e-3);
        assert_eq!(physics.body_count(), 1);

        seg.despawn(&mut physics);
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_obstacle_scored_once() {
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let mut obstacle = Obstacle::spawn(
            &mut physics,
            EntityId(1),
            ObstacleKind::Short,
            500.0,
            655.0,
            70.0,
            50.0,
            "obstacle_small_Creature",
        );
        assert!(!obstacle.is_scored());
        assert!(obstacle.mark_scored());
        assert!(obstacle.is_scored());
        assert!(!obstacle.mark_scored());
        assert_eq!(obstacle.right_edge_x(), 535.0);
    }

    #[test]
    fn test_every_obstacle_kind_has_skins() {
        for kind in ObstacleKind::ALL {
            assert!(!kind.skins().is_empty());
        }
    }
}
