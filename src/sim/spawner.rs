//! Obstacle and power-up spawning
//!
//! A countdown timer drops one obstacle just past the right screen edge each
//! time it expires. The delay range shrinks as the score climbs.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Collectible, Entity, Obstacle, ObstacleKind, PowerUpKind};
use super::physics::{EntityId, EntityIds, PhysicsWorld};
use crate::Viewport;
use crate::px_to_m;
use crate::tuning::Tuning;

/// Where a power-up sits relative to the obstacle it accompanies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    OnTop,
    After,
}

impl Placement {
    pub const ALL: [Placement; 3] = [Placement::Before, Placement::OnTop, Placement::After];
}

/// What a timer expiry produced
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnOutcome {
    pub obstacle: Option<EntityId>,
    pub power_up: Option<PowerUpKind>,
}

/// Power-up center for a placement around an obstacle (all meters).
///
/// Returns `None` when the geometry is not finite.
pub fn power_up_position(
    placement: Placement,
    obstacle_center: Vec2,
    obstacle_half: Vec2,
    radius: f32,
    margin: f32,
    ground_y: f32,
) -> Option<Vec2> {
    let top = obstacle_center.y - obstacle_half.y;
    let side_y = top - radius * 0.1;
    let pos = match placement {
        Placement::Before => Vec2::new(obstacle_center.x - obstacle_half.x - radius - margin, side_y),
        Placement::OnTop => Vec2::new(obstacle_center.x, top - radius - margin),
        Placement::After => Vec2::new(obstacle_center.x + obstacle_half.x + radius + margin, side_y),
    };
    if !pos.is_finite() {
        return None;
    }

    // Never below the ground surface, never above the screen top
    let y = pos.y.min(ground_y - radius).max(radius);
    let pos = Vec2::new(pos.x, y);
    pos.is_finite().then_some(pos)
}

#[derive(Debug, Clone)]
pub struct Spawner {
    timer: f32,
    rng: Pcg32,
    tuning: Tuning,
    viewport: Viewport,
}

impl Spawner {
    pub fn new(seed: u64, viewport: Viewport, tuning: &Tuning) -> Self {
        Self {
            timer: tuning.initial_spawn_delay,
            rng: Pcg32::seed_from_u64(seed),
            tuning: tuning.clone(),
            viewport,
        }
    }

    /// Rearm the timer for a fresh session
    pub fn reset(&mut self) {
        self.timer = self.tuning.initial_spawn_delay;
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Y of the walkable ground top, in pixels
    pub fn ground_surface_y(&self) -> f32 {
        self.viewport.height - self.tuning.ground_height_px
    }

    /// Delay bounds for the next obstacle at this score
    pub fn delay_range(&self, score: u32) -> (f32, f32) {
        let t = &self.tuning;
        let reduction = (score / t.delay_step_score.max(1)) as f32 * t.delay_step;
        let min = (t.base_min_delay - reduction).max(t.absolute_min_delay);
        let max = (t.base_max_delay - reduction).max(t.absolute_max_delay).max(min);
        (min, max)
    }

    pub fn next_delay(&mut self, score: u32) -> f32 {
        let (min, max) = self.delay_range(score);
        self.rng.random_range(min..=max)
    }

    /// Count down and spawn when the timer runs out
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        score: u32,
        camera_x: f32,
        physics: &mut PhysicsWorld,
        ids: &mut EntityIds,
        obstacles: &mut VecDeque<Obstacle>,
        collectibles: &mut VecDeque<Collectible>,
    ) -> Option<SpawnOutcome> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }

        let mut outcome = SpawnOutcome::default();
        if let Some(obstacle) = self.spawn_obstacle(camera_x, physics, ids) {
            outcome.obstacle = Some(obstacle.id());
            if self.rng.random_bool(self.tuning.power_up_chance) {
                outcome.power_up = self.spawn_power_up(&obstacle, physics, ids, collectibles);
            }
            obstacles.push_back(obstacle);
        }

        self.timer = self.next_delay(score);
        Some(outcome)
    }

    fn spawn_obstacle(
        &mut self,
        camera_x: f32,
        physics: &mut PhysicsWorld,
        ids: &mut EntityIds,
    ) -> Option<Obstacle> {
        let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
        let size = self.tuning.obstacle_size(kind);
        let skins = kind.skins();
        let skin = skins[self.rng.random_range(0..skins.len())];

        let x = camera_x + self.viewport.width + self.tuning.spawn_offset_px;
        let y = self.ground_surface_y() - size.height / 2.0;
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Skipping obstacle spawn: invalid coordinate ({x}, {y})");
            return None;
        }

        log::debug!("Spawning {:?} obstacle at x={:.0}px", kind, x);
        Some(Obstacle::spawn(
            physics,
            ids.next_id(),
            kind,
            x,
            y,
            size.width,
            size.height,
            skin,
        ))
    }

    fn spawn_power_up(
        &mut self,
        obstacle: &Obstacle,
        physics: &mut PhysicsWorld,
        ids: &mut EntityIds,
        collectibles: &mut VecDeque<Collectible>,
    ) -> Option<PowerUpKind> {
        let placement = Placement::ALL[self.rng.random_range(0..Placement::ALL.len())];
        let radius = px_to_m(self.tuning.power_up_radius_px);
        let ground_y = px_to_m(self.ground_surface_y());

        let Some(pos) = power_up_position(
            placement,
            obstacle.position(),
            obstacle.half_extents(),
            radius,
            self.tuning.power_up_margin,
            ground_y,
        ) else {
            log::warn!("Skipping power-up spawn: invalid coordinate near {:?}", obstacle.kind());
            return None;
        };

        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        log::debug!("Spawning {:?} power-up ({:?}) at {:?}", kind, placement, pos);
        collectibles.push_back(Collectible::spawn(physics, ids.next_id(), kind, pos, radius));
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spawner_with(tuning: Tuning) -> Spawner {
        Spawner::new(7, Viewport::default(), &tuning)
    }

    #[test]
    fn test_delay_range_shrinks_with_score() {
        let spawner = spawner_with(Tuning::default());
        assert_eq!(spawner.delay_range(0), (1.5, 3.0));
        assert_eq!(spawner.delay_range(9), (1.5, 3.0));
        let (min, max) = spawner.delay_range(50);
        assert!((min - 1.0).abs() < 1e-5);
        assert!((max - 2.5).abs() < 1e-5);
        assert_eq!(spawner.delay_range(10_000), (0.8, 1.5));
    }

    #[test]
    fn test_spawns_once_per_expiry() {
        let tuning = Tuning {
            power_up_chance: 0.0,
            ..Tuning::default()
        };
        let mut spawner = spawner_with(tuning);
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let mut ids = EntityIds::default();
        let mut obstacles = VecDeque::new();
        let mut collectibles = VecDeque::new();

        // 3 s initial delay: nothing after 2.9 s
        let none = spawner.update(2.9, 0, 0.0, &mut physics, &mut ids, &mut obstacles, &mut collectibles);
        assert!(none.is_none());

        let camera_x = 250.0;
        let outcome = spawner
            .update(0.2, 0, camera_x, &mut physics, &mut ids, &mut obstacles, &mut collectibles)
            .expect("timer expired");
        assert!(outcome.obstacle.is_some());
        assert!(outcome.power_up.is_none());
        assert_eq!(obstacles.len(), 1);
        assert!(collectibles.is_empty());

        let obstacle = &obstacles[0];
        let size = Tuning::default().obstacle_size(obstacle.kind());
        assert_eq!(obstacle.position_px().x, camera_x + 1280.0 + 100.0);
        assert_eq!(obstacle.position_px().y + size.height / 2.0, 680.0);
        assert_eq!(outcome.obstacle, Some(obstacle.id()));

        let (min, max) = spawner.delay_range(0);
        assert!(spawner.timer() >= min && spawner.timer() <= max);
    }

    #[test]
    fn test_guaranteed_power_up() {
        let tuning = Tuning {
            power_up_chance: 1.0,
            initial_spawn_delay: 0.0,
            ..Tuning::default()
        };
        let mut spawner = spawner_with(tuning);
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let mut ids = EntityIds::default();
        let mut obstacles = VecDeque::new();
        let mut collectibles = VecDeque::new();

        let outcome = spawner
            .update(0.016, 0, 0.0, &mut physics, &mut ids, &mut obstacles, &mut collectibles)
            .unwrap();
        assert!(outcome.power_up.is_some());
        assert_eq!(collectibles.len(), 1);

        let ground_y = px_to_m(680.0);
        let c = &collectibles[0];
        assert!(c.position().y <= ground_y - c.radius());
        assert_eq!(physics.body_count(), 2);
    }

    #[test]
    fn test_non_finite_camera_skips_but_reseeds() {
        let tuning = Tuning {
            initial_spawn_delay: 0.0,
            ..Tuning::default()
        };
        let mut spawner = spawner_with(tuning);
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let mut ids = EntityIds::default();
        let mut obstacles = VecDeque::new();
        let mut collectibles = VecDeque::new();

        let outcome = spawner
            .update(0.016, 0, f32::NAN, &mut physics, &mut ids, &mut obstacles, &mut collectibles)
            .unwrap();
        assert_eq!(outcome, SpawnOutcome::default());
        assert!(obstacles.is_empty());
        assert!(spawner.timer() >= 1.5);
    }

    #[test]
    fn test_power_up_placements() {
        let center = Vec2::new(10.0, 20.0);
        let half = Vec2::new(1.0, 1.0);
        let r = 0.5;
        let ground = 25.0;

        let before = power_up_position(Placement::Before, center, half, r, 0.05, ground).unwrap();
        assert!((before.x - 8.45).abs() < 1e-5);
        let top = power_up_position(Placement::OnTop, center, half, r, 0.05, ground).unwrap();
        assert_eq!(top.x, 10.0);
        assert!((top.y - 18.45).abs() < 1e-5);
        let after = power_up_position(Placement::After, center, half, r, 0.05, ground).unwrap();
        assert!((after.x - 11.55).abs() < 1e-5);
    }

    #[test]
    fn test_power_up_clamped_above_ground() {
        // Obstacle top below the ground surface
        let pos = power_up_position(
            Placement::Before,
            Vec2::new(0.0, 30.0),
            Vec2::new(1.0, 1.0),
            0.5,
            0.05,
            20.0,
        )
        .unwrap();
        assert_eq!(pos.y, 19.5);
    }

    #[test]
    fn test_power_up_rejects_nan() {
        let pos = power_up_position(
            Placement::OnTop,
            Vec2::new(f32::NAN, 0.0),
            Vec2::ONE,
            0.5,
            0.05,
            20.0,
        );
        assert!(pos.is_none());
    }

    proptest! {
        #[test]
        fn prop_next_delay_in_bounds(score in 0u32..2000, seed in any::<u64>()) {
            let mut spawner = Spawner::new(seed, Viewport::default(), &Tuning::default());
            let (min, max) = spawner.delay_range(score);
            prop_assert!(min >= 0.8);
            prop_assert!(max >= 1.5);
            prop_assert!(min <= max);
            let delay = spawner.next_delay(score);
            prop_assert!(delay >= min && delay <= max);
        }
    }
}
