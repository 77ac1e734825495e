//! The player-controlled runner
//!
//! Horizontal motion is forced every frame from the score; the only player
//! input is `jump`. Multi-jumps fall out of the `jumps_remaining` counter,
//! refilled whenever the ground probe finds footing.

use glam::Vec2;

use super::entity::{Aabb, Entity, PowerUpKind};
use super::physics::{BodyHandle, Category, EntityId, PhysicsWorld};
use crate::tuning::Tuning;
use crate::{px_to_m, vec_m_to_px};

/// Vertical speed below which a grounded runner counts as resting
const RESTING_VY_TOLERANCE: f32 = 0.1;

/// Runner constants taken from the tuning block at construction
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerParams {
    pub radius: f32,
    pub jump_velocity: f32,
    pub base_jumps: u32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub speed_step_score: u32,
    pub max_speed: f32,
    pub probe_slack: f32,
    pub power_up_duration: f32,
}

impl RunnerParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            radius: px_to_m(tuning.runner_radius_px),
            jump_velocity: tuning.jump_velocity,
            base_jumps: tuning.base_jumps,
            base_speed: tuning.base_speed,
            speed_step: tuning.speed_step,
            speed_step_score: tuning.speed_step_score.max(1),
            max_speed: tuning.max_speed,
            probe_slack: tuning.ground_probe_slack,
            power_up_duration: tuning.power_up_duration,
        }
    }

    /// `base + floor(score / step_score) * step`, capped at `max_speed`
    pub fn speed_for_score(&self, score: u32) -> f32 {
        let steps = (score / self.speed_step_score) as f32;
        (self.base_speed + steps * self.speed_step).min(self.max_speed)
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    id: EntityId,
    body: BodyHandle,
    params: RunnerParams,
    jumps_remaining: u32,
    dead: bool,
    extra_jump_timer: f32,
    double_score_timer: f32,
    speed: f32,
}

impl Runner {
    /// Create the runner's body at `spawn` (meters)
    pub fn new(physics: &mut PhysicsWorld, id: EntityId, spawn: Vec2, params: RunnerParams) -> Self {
        let body = physics.create_runner_body(id, spawn, params.radius);
        Self {
            id,
            body,
            jumps_remaining: params.base_jumps,
            dead: false,
            extra_jump_timer: 0.0,
            double_score_timer: 0.0,
            speed: params.base_speed,
            params,
        }
    }

    /// Revive in place at `spawn`: stopped, full jumps, no power-ups
    pub fn reset(&mut self, physics: &mut PhysicsWorld, spawn: Vec2) {
        physics.teleport(self.body, spawn);
        self.dead = false;
        self.jumps_remaining = self.params.base_jumps;
        self.extra_jump_timer = 0.0;
        self.double_score_timer = 0.0;
        self.speed = self.params.base_speed;
    }

    /// Frame update: force speed, probe ground, refill jumps, tick power-ups
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32, score: u32) {
        self.speed = self.params.speed_for_score(score);

        let velocity = physics.velocity(self.body);
        physics.set_velocity(self.body, Vec2::new(self.speed, velocity.y));

        if self.is_on_ground(physics) && velocity.y >= -RESTING_VY_TOLERANCE {
            self.jumps_remaining = self.max_jumps();
        }

        self.double_score_timer = (self.double_score_timer - dt).max(0.0);
        if self.extra_jump_timer > 0.0 {
            self.extra_jump_timer = (self.extra_jump_timer - dt).max(0.0);
            if self.extra_jump_timer == 0.0 {
                self.jumps_remaining = self.jumps_remaining.min(self.max_jumps());
            }
        }
    }

    /// Short downward probe against ground and obstacle tops
    pub fn is_on_ground(&self, physics: &PhysicsWorld) -> bool {
        let origin = physics.position(self.body);
        physics
            .cast_ray(
                origin,
                Vec2::Y,
                self.params.radius + self.params.probe_slack,
                Category::GROUND | Category::OBSTACLE,
            )
            .is_some()
    }

    /// Launch upward if a jump is left. Returns whether it happened.
    pub fn jump(&mut self, physics: &mut PhysicsWorld) -> bool {
        if self.dead || self.jumps_remaining == 0 {
            return false;
        }
        let velocity = physics.velocity(self.body);
        physics.set_velocity(self.body, Vec2::new(velocity.x, self.params.jump_velocity));
        self.jumps_remaining -= 1;
        true
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ExtraJump => {
                self.extra_jump_timer = self.params.power_up_duration;
                self.jumps_remaining = (self.jumps_remaining + 1).min(self.max_jumps());
            }
            PowerUpKind::DoubleScore => {
                self.double_score_timer = self.params.power_up_duration;
            }
        }
        log::debug!("Power-up activated: {:?}", kind);
    }

    pub fn max_jumps(&self) -> u32 {
        if self.has_extra_jump() {
            self.params.base_jumps + 1
        } else {
            self.params.base_jumps
        }
    }

    pub fn jumps_remaining(&self) -> u32 {
        self.jumps_remaining
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }

    pub fn has_extra_jump(&self) -> bool {
        self.extra_jump_timer > 0.0
    }

    pub fn has_double_score(&self) -> bool {
        self.double_score_timer > 0.0
    }

    pub fn extra_jump_timer(&self) -> f32 {
        self.extra_jump_timer
    }

    pub fn double_score_timer(&self) -> f32 {
        self.double_score_timer
    }

    /// Current forced horizontal speed (m/s)
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Physical radius in meters
    pub fn radius(&self) -> f32 {
        self.params.radius
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Vec2 {
        physics.position(self.body)
    }

    pub fn position_px(&self, physics: &PhysicsWorld) -> Vec2 {
        vec_m_to_px(physics.position(self.body))
    }

    pub fn params(&self) -> &RunnerParams {
        &self.params
    }
}

impl Entity for Runner {
    fn id(&self) -> EntityId {
        self.id
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn update(&mut self, physics: &mut PhysicsWorld, dt: f32, score: u32) {
        Runner::update(self, physics, dt, score);
    }

    fn bounds(&self, physics: &PhysicsWorld) -> Aabb {
        Aabb::new(physics.position(self.body), Vec2::splat(self.params.radius))
    }
}
