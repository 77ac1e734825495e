//! Top-level game state machine
//!
//! MAIN_MENU, PLAYING, GAME_OVER and SHOP. Input events are dispatched to
//! the current phase; only PLAYING advances the simulation.

use std::path::PathBuf;

use glam::Vec2;

use crate::assets::TextureProvider;
use crate::audio::{AudioManager, SoundBackend, SoundEffect};
use crate::error::Result;
use crate::highscores::HighScores;
use crate::render::{Frame, SceneRenderer};
use crate::settings::Settings;
use crate::shop::{self, CATALOG};
use crate::sim::{self, GameEvent, RunState};
use crate::ui::{self, Button};
use crate::wallet::Wallet;

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    MainMenu,
    Playing,
    GameOver,
    Shop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Other,
}

/// Discrete input consumed by the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    /// Screen-space pixels
    MouseDown(Vec2),
}

pub struct Game {
    phase: GamePhase,
    run: RunState,
    high_scores: HighScores,
    wallet: Wallet,
    audio: AudioManager,
    renderer: SceneRenderer,
    scores_path: PathBuf,
    wallet_path: PathBuf,
    running: bool,
    last_score: u32,
    new_best: bool,
}

impl Game {
    /// Build every subsystem. Fails only on unusable configuration.
    pub fn new(
        settings: &Settings,
        sound: Box<dyn SoundBackend>,
        textures: Box<dyn TextureProvider>,
    ) -> Result<Self> {
        let seed = settings.resolve_seed();
        let run = RunState::new(settings.tuning.clone(), settings.viewport(), seed)?;

        let mut audio = AudioManager::new(sound);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        log::info!("Game initialized with seed: {seed}");
        Ok(Self {
            phase: GamePhase::MainMenu,
            run,
            high_scores: HighScores::load(&settings.scores_path),
            wallet: Wallet::load(&settings.wallet_path),
            audio,
            renderer: SceneRenderer::new(textures),
            scores_path: settings.scores_path.clone(),
            wallet_path: settings.wallet_path.clone(),
            running: true,
            last_score: 0,
            new_best: false,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Score of the most recently finished session
    pub fn last_score(&self) -> u32 {
        self.last_score
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::info!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn start_run(&mut self) {
        self.run.reset();
        self.new_best = false;
        self.set_phase(GamePhase::Playing);
    }

    /// Dispatch one input event to the current phase
    pub fn handle_event(&mut self, event: InputEvent) {
        if event == InputEvent::Quit {
            log::info!("Quit requested");
            self.running = false;
            return;
        }

        match self.phase {
            GamePhase::Playing => {
                if event == InputEvent::KeyDown(Key::Space) {
                    self.run.jump();
                }
            }
            GamePhase::MainMenu => {
                let Some(button) = self.clicked(event, &ui::main_menu_buttons(self.run.viewport()))
                else {
                    return;
                };
                self.audio.play(SoundEffect::UiClick);
                match button {
                    Button::Start => self.start_run(),
                    Button::Shop => self.set_phase(GamePhase::Shop),
                    Button::Quit => {
                        log::info!("Quit from main menu");
                        self.running = false;
                    }
                    _ => {}
                }
            }
            GamePhase::GameOver => {
                let Some(button) = self.clicked(event, &ui::game_over_buttons(self.run.viewport()))
                else {
                    return;
                };
                self.audio.play(SoundEffect::UiClick);
                match button {
                    Button::Restart => self.start_run(),
                    Button::MainMenu => self.set_phase(GamePhase::MainMenu),
                    Button::Shop => self.set_phase(GamePhase::Shop),
                    _ => {}
                }
            }
            GamePhase::Shop => {
                let Some(button) = self.clicked(event, &ui::shop_buttons(self.run.viewport())) else {
                    return;
                };
                match button {
                    Button::Back => {
                        self.audio.play(SoundEffect::UiClick);
                        self.set_phase(GamePhase::MainMenu);
                    }
                    Button::ShopItem(i) => self.shop_click(i),
                    _ => {}
                }
            }
        }
    }

    fn clicked(&self, event: InputEvent, buttons: &[(Button, ui::Rect)]) -> Option<Button> {
        match event {
            InputEvent::MouseDown(pos) => ui::hit_test(buttons, pos),
            _ => None,
        }
    }

    fn shop_click(&mut self, index: usize) {
        let Some(item) = CATALOG.get(index) else {
            return;
        };
        match shop::purchase_or_equip(&mut self.wallet, item.id) {
            Ok(_) => {
                self.audio.play(SoundEffect::UiClick);
                self.wallet.save(&self.wallet_path);
            }
            Err(e) => log::info!("Shop: {e}"),
        }
    }

    /// Advance one frame. Only PLAYING does anything.
    pub fn update(&mut self, dt: f32) {
        if self.phase != GamePhase::Playing {
            return;
        }

        let died = sim::tick(&mut self.run, dt);
        for event in self.run.drain_events() {
            match event {
                GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
                GameEvent::PowerUpCollected(_) => self.audio.play(SoundEffect::Pickup),
                GameEvent::Crashed => self.audio.play(SoundEffect::Crash),
                GameEvent::ObstaclePassed { .. } => {}
            }
        }

        if died {
            self.finish_run();
        }
    }

    /// Record the session: high scores, coins, then GAME_OVER
    fn finish_run(&mut self) {
        let score = self.run.score();
        let previous_best = self.high_scores.top_score();
        self.last_score = score;

        if let Some(rank) = self.high_scores.add_score(score) {
            log::info!("Score {score} placed #{rank}");
        }
        self.high_scores.save(&self.scores_path);

        self.new_best = score > 0 && previous_best.is_none_or(|best| score > best);
        if self.new_best {
            self.audio.play(SoundEffect::HighScore);
        }

        self.wallet.earn(u64::from(score));
        self.wallet.save(&self.wallet_path);

        self.set_phase(GamePhase::GameOver);
    }

    /// Describe the current screen
    pub fn render(&mut self) -> Frame {
        let mut frame = Frame::new();
        let viewport = self.run.viewport();
        let runner_texture = shop::runner_texture(&self.wallet);

        match self.phase {
            GamePhase::MainMenu => {
                self.renderer.draw_world(&mut frame, &self.run, runner_texture);
                self.renderer
                    .draw_main_menu(&mut frame, viewport, &self.high_scores);
            }
            GamePhase::Playing => {
                self.renderer.draw_world(&mut frame, &self.run, runner_texture);
                self.renderer.draw_hud(&mut frame, &self.run);
            }
            GamePhase::GameOver => {
                self.renderer.draw_world(&mut frame, &self.run, runner_texture);
                self.renderer
                    .draw_game_over(&mut frame, viewport, self.last_score, self.new_best);
            }
            GamePhase::Shop => {
                self.renderer.draw_shop(&mut frame, viewport, &self.wallet);
            }
        }
        frame
    }
}
