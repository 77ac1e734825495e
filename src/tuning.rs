//! Data-driven game balance
//!
//! One consistent constant set. Lengths suffixed `_px` are screen pixels,
//! everything else is in physics meters and seconds.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::sim::ObstacleKind;

/// Width and height of an obstacle kind, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSize {
    pub width: f32,
    pub height: f32,
}

impl ObstacleSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Downward gravity (m/s²)
    pub gravity: f32,
    pub ground_height_px: f32,
    pub ground_segment_width_px: f32,
    pub initial_ground_segments: usize,
    /// Ground generated this far past the right screen edge
    pub lookahead_px: f32,

    // === Runner ===
    pub runner_radius_px: f32,
    pub runner_spawn_x_px: f32,
    /// Spawn height above the ground surface
    pub runner_spawn_height_px: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    pub base_jumps: u32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub speed_step_score: u32,
    pub max_speed: f32,
    /// Ground probe reaches this far past the runner radius
    pub ground_probe_slack: f32,

    // === Obstacles ===
    pub short_obstacle: ObstacleSize,
    pub tall_obstacle: ObstacleSize,
    pub wide_obstacle: ObstacleSize,
    /// Obstacles spawn this far past the right screen edge
    pub spawn_offset_px: f32,
    pub initial_spawn_delay: f32,
    pub base_min_delay: f32,
    pub base_max_delay: f32,
    pub absolute_min_delay: f32,
    pub absolute_max_delay: f32,
    pub delay_step: f32,
    pub delay_step_score: u32,

    // === Power-ups ===
    pub power_up_radius_px: f32,
    pub power_up_margin: f32,
    pub power_up_chance: f64,
    pub power_up_duration: f32,

    // === Collision ===
    pub hitbox_forgiveness: f32,
    pub collision_buffer: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 50.0,
            ground_height_px: 40.0,
            ground_segment_width_px: 800.0,
            initial_ground_segments: 3,
            lookahead_px: 200.0,

            runner_radius_px: 25.0,
            runner_spawn_x_px: 400.0,
            runner_spawn_height_px: 100.0,
            jump_velocity: -20.0,
            base_jumps: 2,
            base_speed: 10.0,
            speed_step: 2.0,
            speed_step_score: 5,
            max_speed: 30.0,
            ground_probe_slack: 0.1,

            short_obstacle: ObstacleSize::new(70.0, 50.0),
            tall_obstacle: ObstacleSize::new(70.0, 150.0),
            wide_obstacle: ObstacleSize::new(250.0, 25.0),
            spawn_offset_px: 100.0,
            initial_spawn_delay: 3.0,
            base_min_delay: 1.5,
            base_max_delay: 3.0,
            absolute_min_delay: 0.8,
            absolute_max_delay: 1.5,
            delay_step: 0.1,
            delay_step_score: 10,

            power_up_radius_px: 20.0,
            power_up_margin: 0.05,
            power_up_chance: 0.25,
            power_up_duration: 8.0,

            hitbox_forgiveness: 0.85,
            collision_buffer: 0.1,
        }
    }
}

impl Tuning {
    /// Dimensions for an obstacle kind
    pub fn obstacle_size(&self, kind: ObstacleKind) -> ObstacleSize {
        match kind {
            ObstacleKind::Short => self.short_obstacle,
            ObstacleKind::Tall => self.tall_obstacle,
            ObstacleKind::Wide => self.wide_obstacle,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("gravity", self.gravity),
            ("ground_height_px", self.ground_height_px),
            ("ground_segment_width_px", self.ground_segment_width_px),
            ("runner_radius_px", self.runner_radius_px),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("power_up_radius_px", self.power_up_radius_px),
            ("base_min_delay", self.base_min_delay),
            ("base_max_delay", self.base_max_delay),
            ("absolute_min_delay", self.absolute_min_delay),
            ("absolute_max_delay", self.absolute_max_delay),
            ("power_up_duration", self.power_up_duration),
            ("hitbox_forgiveness", self.hitbox_forgiveness),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GameError::config(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("lookahead_px", self.lookahead_px),
            ("runner_spawn_height_px", self.runner_spawn_height_px),
            ("speed_step", self.speed_step),
            ("ground_probe_slack", self.ground_probe_slack),
            ("spawn_offset_px", self.spawn_offset_px),
            ("initial_spawn_delay", self.initial_spawn_delay),
            ("delay_step", self.delay_step),
            ("power_up_margin", self.power_up_margin),
            ("collision_buffer", self.collision_buffer),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GameError::config(format!(
                    "{name} must be zero or more, got {value}"
                )));
            }
        }
        if !self.runner_spawn_x_px.is_finite() {
            return Err(GameError::config("runner_spawn_x_px must be finite"));
        }

        for (name, size) in [
            ("short_obstacle", self.short_obstacle),
            ("tall_obstacle", self.tall_obstacle),
            ("wide_obstacle", self.wide_obstacle),
        ] {
            let finite = size.width.is_finite() && size.height.is_finite();
            if !(finite && size.width > 0.0 && size.height > 0.0) {
                return Err(GameError::config(format!("{name} must have a positive size")));
            }
        }

        if !self.jump_velocity.is_finite() || self.jump_velocity >= 0.0 {
            return Err(GameError::config("jump_velocity must be negative (up)"));
        }
        if self.base_speed > self.max_speed {
            return Err(GameError::config("base_speed exceeds max_speed"));
        }
        if self.base_jumps == 0 {
            return Err(GameError::config("base_jumps must be at least 1"));
        }
        if self.initial_ground_segments == 0 {
            return Err(GameError::config("initial_ground_segments must be at least 1"));
        }
        if self.speed_step_score == 0 || self.delay_step_score == 0 {
            return Err(GameError::config("score step divisors must be non-zero"));
        }
        if self.base_min_delay > self.base_max_delay
            || self.absolute_min_delay > self.absolute_max_delay
        {
            return Err(GameError::config("spawn delay minimum exceeds maximum"));
        }
        if self.hitbox_forgiveness > 1.0 {
            return Err(GameError::config("hitbox_forgiveness must not exceed 1.0"));
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(GameError::config("power_up_chance must be a probability"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_gravity() {
        let tuning = Tuning {
            gravity: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(tuning.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_upward_gravity_jump() {
        let tuning = Tuning {
            jump_velocity: 5.0,
            ..Tuning::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_overflowing_delay() {
        // 1e39 does not fit in an f32 and parses as infinity
        let tuning: Tuning = serde_json::from_str(r#"{"base_max_delay": 1e39}"#).unwrap();
        assert!(tuning.base_max_delay.is_infinite());
        assert!(matches!(tuning.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_delay_step() {
        let tuning = Tuning {
            delay_step: -0.5,
            ..Tuning::default()
        };
        assert!(matches!(tuning.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"gravity": 30.0}"#).unwrap();
        assert_eq!(tuning.gravity, 30.0);
        assert_eq!(tuning.jump_velocity, -20.0);
        assert_eq!(tuning.tall_obstacle, ObstacleSize::new(70.0, 150.0));
    }
}
