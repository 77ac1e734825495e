//! Fixed-rate frame loop
//!
//! Each frame drains input, dispatches it, advances the game, then presents
//! the rendered frame. Early frames sleep off the rest of the frame time; late
//! frames are not compensated.

use std::time::{Duration, Instant};

use crate::consts::SIM_DT;
use crate::game::{Game, GamePhase, InputEvent, Key};
use crate::render::FrameSink;
use crate::sim::{Entity, ObstacleKind};
use crate::ui::{self, Button};

/// Source of discrete input events, drained once per frame
pub trait InputSource {
    fn poll_events(&mut self, game: &Game) -> Vec<InputEvent>;
}

/// Run until the game stops or `max_frames` frames have been presented.
///
/// A `target_fps` of zero disables the throttle. Returns frames run.
pub fn run(
    game: &mut Game,
    input: &mut dyn InputSource,
    sink: &mut dyn FrameSink,
    target_fps: u32,
    max_frames: Option<u64>,
) -> u64 {
    let budget = (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps)));
    let mut frames = 0;

    while game.is_running() {
        let start = Instant::now();

        for event in input.poll_events(game) {
            game.handle_event(event);
        }
        game.update(SIM_DT);
        let frame = game.render();
        sink.present(&frame);
        frames += 1;

        if max_frames.is_some_and(|max| frames >= max) {
            log::info!("Frame limit reached ({frames})");
            break;
        }

        if let Some(budget) = budget {
            let elapsed = start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    }
    frames
}

/// Headless demo driver.
///
/// Starts a run from the menu, jumps over what is ahead, returns to the
/// menu after each death and quits once `runs` sessions are done.
#[derive(Debug, Clone)]
pub struct Autopilot {
    runs: u32,
    finished: u32,
    /// Pixels ahead of the runner at which to take off
    jump_distance: f32,
}

impl Autopilot {
    pub fn new(runs: u32) -> Self {
        Self {
            runs,
            finished: 0,
            jump_distance: 140.0,
        }
    }

    pub fn finished_runs(&self) -> u32 {
        self.finished
    }

    fn click(layout: &[(Button, ui::Rect)], button: Button) -> Option<InputEvent> {
        ui::button_rect(layout, button).map(|rect| InputEvent::MouseDown(rect.center()))
    }

    fn play(&self, game: &Game) -> Option<InputEvent> {
        let run = game.run_state();
        let physics = run.physics();
        let runner = run.runner();
        let runner_px = runner.position_px(physics);
        let velocity = physics.velocity(runner.body());

        // Lead distance grows with speed
        let lead = self.jump_distance * (runner.speed() / run.tuning().base_speed).max(1.0);
        let threat = run.obstacles().iter().find(|o| {
            let dx = o.position_px().x - o.width_px() / 2.0 - runner_px.x;
            dx > 0.0 && dx < lead
        })?;

        let grounded = runner.jumps_remaining() == runner.max_jumps() && velocity.y.abs() < 1.0;
        // Tall obstacles need a second jump near the apex
        let second = threat.kind() == ObstacleKind::Tall
            && runner.jumps_remaining() > 0
            && velocity.y >= 0.0
            && runner_px.y > threat.position_px().y - threat.height_px() / 2.0;

        (grounded || second).then_some(InputEvent::KeyDown(Key::Space))
    }
}

impl InputSource for Autopilot {
    fn poll_events(&mut self, game: &Game) -> Vec<InputEvent> {
        let viewport = game.run_state().viewport();
        let event = match game.phase() {
            GamePhase::MainMenu if self.finished >= self.runs => Some(InputEvent::Quit),
            GamePhase::MainMenu => Self::click(&ui::main_menu_buttons(viewport), Button::Start),
            GamePhase::Playing => self.play(game),
            GamePhase::GameOver => {
                self.finished += 1;
                log::info!("Autopilot run {} ended with score {}", self.finished, game.last_score());
                Self::click(&ui::game_over_buttons(viewport), Button::MainMenu)
            }
            GamePhase::Shop => Self::click(&ui::shop_buttons(viewport), Button::Back),
        };
        event.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureRegistry;
    use crate::audio::NullAudio;
    use crate::render::{Frame, NullSink};
    use crate::settings::Settings;

    struct Scripted(Vec<Vec<InputEvent>>);

    impl InputSource for Scripted {
        fn poll_events(&mut self, _game: &Game) -> Vec<InputEvent> {
            if self.0.is_empty() {
                Vec::new()
            } else {
                self.0.remove(0)
            }
        }
    }

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        last: Option<Frame>,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, frame: &Frame) {
            self.frames += 1;
            self.last = Some(frame.clone());
        }
    }

    struct Fixture {
        game: Game,
        settings: Settings,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.settings.scores_path);
            let _ = std::fs::remove_file(&self.settings.wallet_path);
        }
    }

    fn fixture(name: &str) -> Fixture {
        let dir = std::env::temp_dir();
        let tag = format!("endless_runner_{}_{name}", std::process::id());
        let settings = Settings {
            seed: Some(3),
            scores_path: dir.join(format!("{tag}_scores.txt")),
            wallet_path: dir.join(format!("{tag}_wallet.json")),
            ..Settings::default()
        };
        let game =
            Game::new(&settings, Box::new(NullAudio), Box::new(TextureRegistry::new())).unwrap();
        Fixture { game, settings }
    }

    #[test]
    fn test_quit_ends_after_frame() {
        let mut f = fixture("rt_quit");
        let mut input = Scripted(vec![vec![], vec![InputEvent::Quit]]);
        let mut sink = CountingSink::default();
        let frames = run(&mut f.game, &mut input, &mut sink, 0, None);
        assert_eq!(frames, 2);
        assert_eq!(sink.frames, 2);
        assert!(sink.last.is_some());
    }

    #[test]
    fn test_frame_limit() {
        let mut f = fixture("rt_limit");
        let mut input = Scripted(Vec::new());
        let frames = run(&mut f.game, &mut input, &mut NullSink, 0, Some(5));
        assert_eq!(frames, 5);
        assert!(f.game.is_running());
    }

    #[test]
    fn test_throttle_paces_frames() {
        let mut f = fixture("rt_throttle");
        let mut input = Scripted(Vec::new());
        let start = Instant::now();
        run(&mut f.game, &mut input, &mut NullSink, 100, Some(3));
        // Two full sleeps at 10 ms each
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_autopilot_starts_and_plays() {
        let mut f = fixture("rt_autopilot");
        let mut pilot = Autopilot::new(1);
        run(&mut f.game, &mut pilot, &mut NullSink, 0, Some(120));
        assert!(matches!(f.game.phase(), GamePhase::Playing | GamePhase::GameOver | GamePhase::MainMenu));
        assert!(f.game.run_state().runner().position_px(f.game.run_state().physics()).x > 400.0);
    }

    #[test]
    fn test_fixture_removes_saved_files() {
        let f = fixture("rt_cleanup");
        let scores = f.settings.scores_path.clone();
        let wallet = f.settings.wallet_path.clone();
        f.game.high_scores().save(&scores);
        f.game.wallet().save(&wallet);
        assert!(scores.exists() && wallet.exists());

        drop(f);
        assert!(!scores.exists());
        assert!(!wallet.exists());
    }

    #[test]
    fn test_autopilot_quits_when_done() {
        let f = fixture("rt_autopilot_quit");
        let mut pilot = Autopilot::new(0);
        assert_eq!(pilot.poll_events(&f.game), vec![InputEvent::Quit]);
    }
}
