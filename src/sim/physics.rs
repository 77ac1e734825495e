//! Rigid-body world adapter
//!
//! Wraps a rapier2d pipeline behind the handful of operations the runner
//! needs: body creation, fixed-step integration and filtered ray casts.
//! Lengths are meters, y grows downward so "negative is up".

use std::num::NonZeroUsize;
use std::ops::BitOr;

use glam::Vec2;
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, Group, ImpulseJointSet,
    IntegrationParameters, InteractionGroups, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, Point, QueryFilter, QueryPipeline, Ray, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet, Vector,
};

use crate::error::{GameError, Result};

/// Stable identifier of a spawned entity, stored in each collider's user data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Hands out increasing entity ids
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Opaque handle to a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Category bitmask used for collision filtering and ray queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category(u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const PLAYER: Category = Category(0x0001);
    pub const GROUND: Category = Category(0x0002);
    pub const OBSTACLE: Category = Category(0x0004);
    pub const COLLECTIBLE: Category = Category(0x0008);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Category) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }

    /// Categories a body of this category may touch
    fn touches(self) -> Category {
        match self {
            Category::PLAYER => Category::GROUND | Category::OBSTACLE | Category::COLLECTIBLE,
            Category::GROUND | Category::OBSTACLE | Category::COLLECTIBLE => Category::PLAYER,
            _ => Category::NONE,
        }
    }

    fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }

    fn interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(self.group(), self.touches().group())
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

/// First hit of a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub category: Category,
    /// Distance along the (unit) ray direction
    pub toi: f32,
}

#[inline]
fn to_vector(v: Vec2) -> Vector<f32> {
    Vector::new(v.x, v.y)
}

#[inline]
fn to_vec2(v: &Vector<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

pub struct PhysicsWorld {
    gravity: Vector<f32>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world with downward gravity of the given magnitude
    pub fn new(gravity: f32) -> Result<Self> {
        if !gravity.is_finite() {
            return Err(GameError::config(format!("gravity must be finite, got {gravity}")));
        }
        Ok(Self {
            gravity: Vector::new(0.0, gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        })
    }

    /// Advance every body by `dt` using `substeps` solver iterations
    pub fn step(&mut self, dt: f32, substeps: usize) {
        self.params.dt = dt;
        self.params.num_solver_iterations =
            NonZeroUsize::new(substeps).unwrap_or(NonZeroUsize::MIN);

        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Dynamic ball for the runner: no rotation, no friction, no bounce
    pub fn create_runner_body(&mut self, owner: EntityId, center: Vec2, radius: f32) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(center))
            .lock_rotations()
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(radius)
            .density(1.0)
            .friction(0.0)
            .restitution(0.0)
            .collision_groups(Category::PLAYER.interaction_groups())
            .user_data(owner.0 as u128)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        BodyHandle(handle)
    }

    /// Fixed axis-aligned box. Sensors report overlap but never push.
    pub fn create_static_box(
        &mut self,
        owner: EntityId,
        center: Vec2,
        half_extents: Vec2,
        category: Category,
        sensor: bool,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(center))
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(0.0)
            .sensor(sensor)
            .collision_groups(category.interaction_groups())
            .user_data(owner.0 as u128)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        BodyHandle(handle)
    }

    /// Fixed circular sensor (power-ups)
    pub fn create_sensor_ball(
        &mut self,
        owner: EntityId,
        center: Vec2,
        radius: f32,
        category: Category,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(center))
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(radius)
            .sensor(true)
            .collision_groups(category.interaction_groups())
            .user_data(owner.0 as u128)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        BodyHandle(handle)
    }

    /// Destroy a body and its attached colliders
    pub fn remove_body(&mut self, handle: BodyHandle) {
        let removed = self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            log::warn!("Tried to remove unknown body {:?}", handle);
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Body center in meters
    pub fn position(&self, handle: BodyHandle) -> Vec2 {
        self.bodies
            .get(handle.0)
            .map(|b| to_vec2(b.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn velocity(&self, handle: BodyHandle) -> Vec2 {
        self.bodies
            .get(handle.0)
            .map(|b| to_vec2(b.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    /// Move a body in place and stop it
    pub fn teleport(&mut self, handle: BodyHandle, center: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.set_translation(to_vector(center), true);
            body.set_linvel(Vector::zeros(), true);
        }
    }

    /// First body hit along `dir` within `max_toi`, restricted to `mask`.
    ///
    /// Sees the world as of the last `step`.
    pub fn cast_ray(&self, origin: Vec2, dir: Vec2, max_toi: f32, mask: Category) -> Option<RayHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }

        let ray = Ray::new(Point::new(origin.x, origin.y), to_vector(dir));
        let filter = QueryFilter::new().groups(InteractionGroups::new(Group::ALL, mask.group()));

        let (collider_handle, toi) = self.query_pipeline.cast_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_toi,
            true,
            filter,
        )?;

        let collider = self.colliders.get(collider_handle)?;
        Some(RayHit {
            entity: EntityId(collider.user_data as u32),
            category: Category(collider.collision_groups().memberships.bits()),
            toi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(50.0).unwrap();
        world.create_static_box(
            EntityId(1),
            Vec2::new(0.0, 10.0),
            Vec2::new(50.0, 0.5),
            Category::GROUND,
            false,
        );
        world
    }

    #[test]
    fn test_rejects_nan_gravity() {
        assert!(PhysicsWorld::new(f32::NAN).is_err());
    }

    #[test]
    fn test_body_falls_and_rests_on_ground() {
        let mut world = world_with_floor();
        let runner = world.create_runner_body(EntityId(2), Vec2::new(0.0, 5.0), 0.8);

        for _ in 0..180 {
            world.step(DT, 3);
        }

        let pos = world.position(runner);
        // Floor top is at y = 9.5, so resting center sits near 8.7
        assert!((pos.y - 8.7).abs() < 0.1, "resting y = {}", pos.y);
        assert!(world.velocity(runner).y.abs() < 0.5);
    }

    #[test]
    fn test_sensor_does_not_push() {
        let mut world = world_with_floor();
        world.create_static_box(
            EntityId(3),
            Vec2::new(0.0, 7.0),
            Vec2::new(2.0, 0.5),
            Category::OBSTACLE,
            true,
        );
        let runner = world.create_runner_body(EntityId(2), Vec2::new(0.0, 3.0), 0.8);

        for _ in 0..180 {
            world.step(DT, 3);
        }

        // Fell through the sensor onto the floor
        assert!(world.position(runner).y > 8.0);
    }

    #[test]
    fn test_ray_cast_respects_mask() {
        let mut world = world_with_floor();
        world.step(DT, 3);

        let hit = world
            .cast_ray(Vec2::new(0.0, 5.0), Vec2::Y, 10.0, Category::GROUND)
            .expect("ray should hit floor");
        assert_eq!(hit.entity, EntityId(1));
        assert_eq!(hit.category, Category::GROUND);
        assert!((hit.toi - 4.5).abs() < 1e-3);

        assert!(world
            .cast_ray(Vec2::new(0.0, 5.0), Vec2::Y, 10.0, Category::OBSTACLE)
            .is_none());
        assert!(world
            .cast_ray(Vec2::new(0.0, 5.0), Vec2::Y, 1.0, Category::GROUND)
            .is_none());
    }

    #[test]
    fn test_teleport_moves_and_stops() {
        let mut world = PhysicsWorld::new(50.0).unwrap();
        let runner = world.create_runner_body(EntityId(2), Vec2::new(1.0, 2.0), 0.5);
        assert_eq!(world.position(runner), Vec2::new(1.0, 2.0));

        world.set_velocity(runner, Vec2::new(10.0, -3.0));
        assert_eq!(world.velocity(runner), Vec2::new(10.0, -3.0));

        world.teleport(runner, Vec2::new(-4.0, 6.5));
        assert_eq!(world.position(runner), Vec2::new(-4.0, 6.5));
        assert_eq!(world.velocity(runner), Vec2::ZERO);
    }

    #[test]
    fn test_remove_releases_body() {
        let mut world = PhysicsWorld::new(50.0).unwrap();
        let handle = world.create_sensor_ball(EntityId(7), Vec2::ZERO, 0.5, Category::COLLECTIBLE);
        assert_eq!(world.body_count(), 1);
        world.remove_body(handle);
        assert_eq!(world.body_count(), 0);
        assert!(!world.contains(handle));
    }

    #[test]
    fn test_category_bits() {
        let mask = Category::GROUND | Category::OBSTACLE;
        assert!(mask.contains(Category::GROUND));
        assert!(!mask.contains(Category::PLAYER));
        assert!(mask.intersects(Category::OBSTACLE));
        assert_eq!(mask.bits(), 0x0006);
    }
}
