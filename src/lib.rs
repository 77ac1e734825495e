//! Endless Runner - a side-scrolling runner over a procedurally extended world
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics adapter, entities, scroller, spawner, collisions)
//! - `game`: Top-level state machine (menu, playing, game over, shop)
//! - `runtime`: Fixed-rate frame loop and input sources
//! - `render`: Backend-neutral draw list handed to the presentation layer
//! - `tuning`: Data-driven game balance
//! - `settings`: Persisted preferences and file locations

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod render;
pub mod runtime;
pub mod settings;
pub mod shop;
pub mod sim;
pub mod tuning;
pub mod ui;
pub mod wallet;

pub use error::{GameError, Result};
pub use game::{Game, GamePhase, InputEvent, Key};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;
pub use wallet::Wallet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Engine constants
pub mod consts {
    /// Conversion factor between physics meters and screen pixels
    pub const PIXELS_PER_METER: f32 = 30.0;
    /// Fixed simulation timestep (one frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Solver iterations per physics step
    pub const PHYSICS_SUBSTEPS: usize = 3;
    /// Frame loop target rate
    pub const TARGET_FPS: u32 = 60;
}

/// Visible screen area in pixels. The camera scrolls horizontally across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen-space center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Pixels to physics meters
#[inline]
pub fn px_to_m(px: f32) -> f32 {
    px / consts::PIXELS_PER_METER
}

/// Physics meters to pixels
#[inline]
pub fn m_to_px(m: f32) -> f32 {
    m * consts::PIXELS_PER_METER
}

/// Convert a pixel-space point to meters
#[inline]
pub fn vec_px_to_m(p: Vec2) -> Vec2 {
    p / consts::PIXELS_PER_METER
}

/// Convert a meter-space point to pixels
#[inline]
pub fn vec_m_to_px(p: Vec2) -> Vec2 {
    p * consts::PIXELS_PER_METER
}
