//! Points for obstacles the runner has cleared

use std::collections::VecDeque;

use super::entity::{Entity, Obstacle};

/// Points for one cleared obstacle
#[inline]
pub fn points_per_obstacle(double_score: bool) -> u32 {
    if double_score { 2 } else { 1 }
}

/// Award every unscored obstacle whose X (pixels) is behind `runner_x`.
///
/// Each obstacle is marked so it pays out exactly once. Returns the points
/// awarded this call.
pub fn award_passed_obstacles(
    runner_x: f32,
    double_score: bool,
    obstacles: &mut VecDeque<Obstacle>,
) -> u32 {
    let points = points_per_obstacle(double_score);
    let mut awarded = 0;
    for obstacle in obstacles.iter_mut() {
        if obstacle.is_scored() || runner_x <= obstacle.position_px().x {
            continue;
        }
        if obstacle.mark_scored() {
            awarded += points;
            log::debug!(
                "Passed obstacle {:?} at x={:.0}px (+{points})",
                obstacle.id(),
                obstacle.position_px().x
            );
        }
    }
    awarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ObstacleKind;
    use crate::sim::physics::{EntityId, PhysicsWorld};

    fn obstacle_at(physics: &mut PhysicsWorld, id: u32, x: f32) -> Obstacle {
        Obstacle::spawn(
            physics,
            EntityId(id),
            ObstacleKind::Short,
            x,
            655.0,
            70.0,
            50.0,
            "obstacle_short",
        )
    }

    #[test]
    fn test_pass_awards_once() {
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let mut obstacles = VecDeque::from(vec![obstacle_at(&mut physics, 1, 500.0)]);

        assert_eq!(award_passed_obstacles(500.0, false, &mut obstacles), 0);
        assert!(!obstacles[0].is_scored());

        assert_eq!(award_passed_obstacles(501.0, false, &mut obstacles), 1);
        assert!(obstacles[0].is_scored());

        assert_eq!(award_passed_obstacles(900.0, false, &mut obstacles), 0);
    }

    #[test]
    fn test_double_score_pays_two() {
        let mut physics = PhysicsWorld::new(50.0).unwrap();
        let mut obstacles = VecDeque::from(vec![
            obstacle_at(&mut physics, 1, 500.0),
            obstacle_at(&mut physics, 2, 800.0),
            obstacle_at(&mut physics, 3, 1200.0),
        ]);
        assert_eq!(award_passed_obstacles(1000.0, true, &mut obstacles), 4);
        assert!(!obstacles[2].is_scored());
    }
}
