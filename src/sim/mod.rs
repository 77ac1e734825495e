//! Simulation core
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Physics through the `PhysicsWorld` adapter only
//! - Seeded RNG only
//! - Entity containers kept in ascending X order

pub mod collision;
pub mod entity;
pub mod physics;
pub mod runner;
pub mod score;
pub mod scroller;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, HitboxParams, circle_aabb_overlap, circle_circle_overlap};
pub use entity::{Aabb, Collectible, Entity, GroundSegment, Obstacle, ObstacleKind, PowerUpKind};
pub use physics::{BodyHandle, Category, EntityId, EntityIds, PhysicsWorld, RayHit};
pub use runner::{Runner, RunnerParams};
pub use score::award_passed_obstacles;
pub use scroller::{WorldScroller, evict_behind};
pub use spawner::{Placement, SpawnOutcome, Spawner};
pub use state::{GameEvent, RunState, runner_spawn};
pub use tick::tick;
