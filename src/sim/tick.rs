//! One PLAYING frame
//!
//! Order: runner update, world generation, spawning, physics step,
//! collision resolution, scoring, eviction, camera follow.

use super::collision;
use super::score::award_passed_obstacles;
use super::scroller::evict_behind;
use super::state::{GameEvent, RunState};
use crate::consts::PHYSICS_SUBSTEPS;

/// Advance the run by `dt` seconds. Returns `true` on the frame the runner dies.
pub fn tick(run: &mut RunState, dt: f32) -> bool {
    if run.runner.is_dead() {
        return false;
    }

    // Entities
    run.runner.update(&mut run.physics, dt, run.score);
    run.scroller
        .update(&mut run.physics, &mut run.ids, run.camera_x);
    run.spawner.update(
        dt,
        run.score,
        run.camera_x,
        &mut run.physics,
        &mut run.ids,
        &mut run.obstacles,
        &mut run.collectibles,
    );

    run.physics.step(dt, PHYSICS_SUBSTEPS);

    // Collisions
    let outcome = collision::resolve(
        &mut run.runner,
        &mut run.physics,
        &run.obstacles,
        &mut run.collectibles,
        run.hitbox,
    );
    run.events.extend(
        outcome
            .collected
            .iter()
            .map(|&kind| GameEvent::PowerUpCollected(kind)),
    );

    // Score
    let runner_px = run.runner.position_px(&run.physics);
    if !run.runner.is_dead() {
        let points = award_passed_obstacles(
            runner_px.x,
            run.runner.has_double_score(),
            &mut run.obstacles,
        );
        if points > 0 {
            run.score += points;
            run.events.push(GameEvent::ObstaclePassed { points });
        }
    }

    evict_behind(&mut run.obstacles, &mut run.physics, run.camera_x);
    evict_behind(&mut run.collectibles, &mut run.physics, run.camera_x);

    let died = outcome.killed_by.is_some();
    if died {
        log::info!("Runner crashed at x={:.0}px, score {}", runner_px.x, run.score);
        run.events.push(GameEvent::Crashed);
    }

    // Camera follows the runner, keeping it centered
    run.camera_x = runner_px.x - run.viewport().width / 2.0;
    died
}
