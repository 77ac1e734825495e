//! Backend-neutral frame description
//!
//! `Game::render` fills a `Frame` with draw commands in screen pixels. A
//! `FrameSink` presents it. Sprites whose texture key is missing are
//! dropped with a single warning per key.

use std::collections::HashSet;

use glam::Vec2;

use crate::Viewport;
use crate::assets::{self, TextureHandle, TextureProvider};
use crate::highscores::HighScores;
use crate::shop::CATALOG;
use crate::sim::{Entity, PowerUpKind, RunState};
use crate::ui::{self, Button, Rect};
use crate::wallet::Wallet;
use crate::{m_to_px, vec_m_to_px};

/// RGBA color
pub type Color = [u8; 4];

pub const SKY: Color = [135, 206, 235, 255];
pub const TEXT: Color = [20, 20, 20, 255];
pub const BUTTON: Color = [100, 100, 100, 255];
pub const OVERLAY: Color = [0, 0, 0, 120];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Regular,
    Large,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite { texture: TextureHandle, rect: Rect },
    FillRect { rect: Rect, color: Color },
    /// Outline only
    StrokeRect { rect: Rect, color: Color },
    Text {
        text: String,
        pos: Vec2,
        size: TextSize,
        color: Color,
    },
}

/// Draw list for one presented frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: TextSize) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
            size,
            color: TEXT,
        });
    }

    /// All text commands, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }
}

/// Presents finished frames
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// Discards frames
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame) {}
}

/// Turns game state into frames
pub struct SceneRenderer {
    textures: Box<dyn TextureProvider>,
    warned: HashSet<String>,
}

impl SceneRenderer {
    pub fn new(textures: Box<dyn TextureProvider>) -> Self {
        Self {
            textures,
            warned: HashSet::new(),
        }
    }

    fn sprite(&mut self, frame: &mut Frame, key: &str, rect: Rect) {
        match self.textures.get_texture(key) {
            Some(texture) => frame.commands.push(DrawCommand::Sprite { texture, rect }),
            None => {
                if self.warned.insert(key.to_string()) {
                    log::warn!("Texture '{key}' not found; skipping");
                }
            }
        }
    }

    /// Ground, obstacles, power-ups and the runner, camera applied
    pub fn draw_world(&mut self, frame: &mut Frame, run: &RunState, runner_texture: &str) {
        let viewport = run.viewport();
        let camera_x = run.camera_x();
        let physics = run.physics();

        frame.fill(Rect::new(0.0, 0.0, viewport.width, viewport.height), SKY);

        for segment in run.scroller().segments() {
            let rect = Rect::new(
                segment.left_edge_px() - camera_x,
                viewport.height - segment.height_px(),
                segment.width_px(),
                segment.height_px(),
            );
            self.sprite(frame, assets::GROUND, rect);
        }

        for obstacle in run.obstacles() {
            let center = obstacle.position_px();
            let rect = Rect::new(
                center.x - obstacle.width_px() / 2.0 - camera_x,
                center.y - obstacle.height_px() / 2.0,
                obstacle.width_px(),
                obstacle.height_px(),
            );
            self.sprite(frame, obstacle.skin(), rect);
        }

        for collectible in run.collectibles() {
            let center = vec_m_to_px(collectible.position());
            let r = m_to_px(collectible.radius());
            let rect = Rect::new(center.x - r - camera_x, center.y - r, r * 2.0, r * 2.0);
            self.sprite(frame, assets::POWER_UP, rect);
        }

        let runner = run.runner();
        let center = vec_m_to_px(physics.position(runner.body()));
        let r = m_to_px(runner.radius());
        let rect = Rect::new(center.x - r - camera_x, center.y - r, r * 2.0, r * 2.0);
        self.sprite(frame, runner_texture, rect);
    }

    /// Score and active power-up timers
    pub fn draw_hud(&mut self, frame: &mut Frame, run: &RunState) {
        frame.text(format!("Score: {}", run.score()), Vec2::new(20.0, 20.0), TextSize::Regular);

        let runner = run.runner();
        let timers = [
            (PowerUpKind::ExtraJump, runner.extra_jump_timer()),
            (PowerUpKind::DoubleScore, runner.double_score_timer()),
        ];
        let mut y = 60.0;
        for (kind, remaining) in timers {
            if remaining <= 0.0 {
                continue;
            }
            let label = match kind {
                PowerUpKind::ExtraJump => "Extra Jump",
                PowerUpKind::DoubleScore => "Double Score",
            };
            frame.text(format!("{label}: {remaining:.1}s"), Vec2::new(20.0, y), TextSize::Regular);
            y += 35.0;
        }
    }

    pub fn draw_main_menu(&mut self, frame: &mut Frame, viewport: Viewport, scores: &HighScores) {
        frame.text(
            "Endless Runner",
            Vec2::new(viewport.width / 2.0 - 150.0, 100.0),
            TextSize::Large,
        );
        draw_buttons(frame, &ui::main_menu_buttons(viewport));

        frame.text("High Scores", Vec2::new(100.0, 250.0), TextSize::Regular);
        for (i, score) in scores.entries.iter().enumerate() {
            frame.text(
                format!("{}. {score}", i + 1),
                Vec2::new(100.0, 290.0 + i as f32 * 35.0),
                TextSize::Regular,
            );
        }
    }

    pub fn draw_game_over(&mut self, frame: &mut Frame, viewport: Viewport, score: u32, new_best: bool) {
        frame.fill(Rect::new(0.0, 0.0, viewport.width, viewport.height), OVERLAY);
        frame.text(
            "Game Over",
            Vec2::new(viewport.width / 2.0 - 120.0, 200.0),
            TextSize::Large,
        );
        frame.text(
            format!("Final Score: {score}"),
            Vec2::new(viewport.width / 2.0 - 75.0, 320.0),
            TextSize::Regular,
        );
        if new_best {
            frame.text(
                "New High Score!",
                Vec2::new(viewport.width / 2.0 - 85.0, 360.0),
                TextSize::Regular,
            );
        }
        draw_buttons(frame, &ui::game_over_buttons(viewport));
    }

    pub fn draw_shop(&mut self, frame: &mut Frame, viewport: Viewport, wallet: &Wallet) {
        frame.fill(Rect::new(0.0, 0.0, viewport.width, viewport.height), SKY);
        frame.text("Shop", Vec2::new(viewport.width / 2.0 - 40.0, 60.0), TextSize::Large);

        let balance_pos = Vec2::new(viewport.width / 2.0 - 60.0, 130.0);
        self.sprite(frame, assets::COIN, Rect::new(balance_pos.x - 35.0, balance_pos.y, 28.0, 28.0));
        frame.text(format!("{} coins", wallet.balance()), balance_pos, TextSize::Regular);

        let buttons = ui::shop_buttons(viewport);
        for &(button, rect) in &buttons {
            frame.commands.push(DrawCommand::StrokeRect { rect, color: BUTTON });
            let label = match button {
                Button::ShopItem(i) => match CATALOG.get(i) {
                    Some(item) if wallet.equipped() == Some(item.id) => format!("{} (equipped)", item.name),
                    Some(item) if wallet.is_unlocked(item.id) => format!("{} (owned)", item.name),
                    Some(item) => format!("{} - {} coins", item.name, item.price),
                    None => continue,
                },
                other => other.label().to_string(),
            };
            frame.text(label, Vec2::new(rect.x + 15.0, rect.y + 12.0), TextSize::Regular);
        }
    }
}

fn draw_buttons(frame: &mut Frame, buttons: &[(Button, Rect)]) {
    for &(button, rect) in buttons {
        frame.commands.push(DrawCommand::StrokeRect { rect, color: BUTTON });
        frame.text(button.label(), Vec2::new(rect.x + 20.0, rect.y + 10.0), TextSize::Regular);
    }
}
