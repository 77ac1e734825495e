//! Run state and simulation events
//!
//! Everything a single run mutates lives in `RunState`: the physics world,
//! the runner, the entity containers, the spawner, score and camera.

use std::collections::VecDeque;

use glam::Vec2;

use super::collision::HitboxParams;
use super::entity::{Collectible, Entity, Obstacle, PowerUpKind};
use super::physics::{EntityIds, PhysicsWorld};
use super::runner::{Runner, RunnerParams};
use super::scroller::WorldScroller;
use super::spawner::Spawner;
use crate::error::{GameError, Result};
use crate::tuning::Tuning;
use crate::{Viewport, px_to_m};

/// Something that happened during a frame, for sound and UI cues
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    PowerUpCollected(PowerUpKind),
    ObstaclePassed { points: u32 },
    Crashed,
}

/// Runner spawn center in meters for a viewport
pub fn runner_spawn(viewport: Viewport, tuning: &Tuning) -> Vec2 {
    let surface = viewport.height - tuning.ground_height_px;
    Vec2::new(
        px_to_m(tuning.runner_spawn_x_px),
        px_to_m(surface - tuning.runner_spawn_height_px),
    )
}

pub struct RunState {
    pub(crate) physics: PhysicsWorld,
    pub(crate) ids: EntityIds,
    pub(crate) runner: Runner,
    pub(crate) scroller: WorldScroller,
    pub(crate) obstacles: VecDeque<Obstacle>,
    pub(crate) collectibles: VecDeque<Collectible>,
    pub(crate) spawner: Spawner,
    pub(crate) hitbox: HitboxParams,
    pub(crate) score: u32,
    pub(crate) camera_x: f32,
    pub(crate) events: Vec<GameEvent>,
    tuning: Tuning,
    viewport: Viewport,
}

impl RunState {
    /// Build a world ready to play. Fails on unusable configuration.
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Result<Self> {
        tuning.validate()?;
        if !(viewport.width.is_finite() && viewport.width > 0.0)
            || !(viewport.height.is_finite() && viewport.height > 0.0)
        {
            return Err(GameError::config(format!(
                "viewport must be positive, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        if tuning.ground_height_px >= viewport.height {
            return Err(GameError::config("ground taller than the viewport"));
        }

        let mut physics = PhysicsWorld::new(tuning.gravity)?;
        let mut ids = EntityIds::default();
        let runner = Runner::new(
            &mut physics,
            ids.next_id(),
            runner_spawn(viewport, &tuning),
            RunnerParams::from_tuning(&tuning),
        );

        let mut state = Self {
            physics,
            ids,
            runner,
            scroller: WorldScroller::new(viewport, &tuning),
            obstacles: VecDeque::new(),
            collectibles: VecDeque::new(),
            spawner: Spawner::new(seed, viewport, &tuning),
            hitbox: HitboxParams::from_tuning(&tuning),
            score: 0,
            camera_x: 0.0,
            events: Vec::new(),
            tuning,
            viewport,
        };
        state.reset();
        log::info!(
            "Run state ready: {}x{} viewport, seed {seed}",
            viewport.width,
            viewport.height
        );
        Ok(state)
    }

    /// Start a fresh run: score 0, runner respawned, world regenerated
    pub fn reset(&mut self) {
        for obstacle in self.obstacles.drain(..) {
            obstacle.despawn(&mut self.physics);
        }
        for collectible in self.collectibles.drain(..) {
            collectible.despawn(&mut self.physics);
        }
        self.scroller.regenerate(&mut self.physics, &mut self.ids);
        self.runner
            .reset(&mut self.physics, runner_spawn(self.viewport, &self.tuning));
        self.spawner.reset();
        self.score = 0;
        self.camera_x = 0.0;
        self.events.clear();
    }

    /// Player jump request
    pub fn jump(&mut self) -> bool {
        let jumped = self.runner.jump(&mut self.physics);
        if jumped {
            self.events.push(GameEvent::Jumped);
        }
        jumped
    }

    /// Take the events pushed since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn scroller(&self) -> &WorldScroller {
        &self.scroller
    }

    pub fn obstacles(&self) -> &VecDeque<Obstacle> {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &VecDeque<Collectible> {
        &self.collectibles
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_over(&self) -> bool {
        self.runner.is_dead()
    }
}
