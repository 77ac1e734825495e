//! Endless Runner entry point
//!
//! Loads settings, builds the game with headless backends and lets the
//! autopilot play a few sessions.

use std::path::Path;
use std::process::ExitCode;

use endless_runner::assets::TextureRegistry;
use endless_runner::audio::NullAudio;
use endless_runner::consts::TARGET_FPS;
use endless_runner::render::NullSink;
use endless_runner::runtime::{self, Autopilot};
use endless_runner::settings::SETTINGS_FILE;
use endless_runner::{Game, Settings};

const DEMO_RUNS: u32 = 3;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Endless Runner starting...");

    let settings = Settings::load_or_create(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
        log::warn!("Could not write default settings: {e}");
        Settings::default()
    });
    let mut game = match Game::new(&settings, Box::new(NullAudio), Box::new(TextureRegistry::new())) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to initialize: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut pilot = Autopilot::new(DEMO_RUNS);
    let frames = runtime::run(&mut game, &mut pilot, &mut NullSink, TARGET_FPS, None);

    log::info!(
        "Finished {} runs in {frames} frames, best score {}",
        pilot.finished_runs(),
        game.high_scores().top_score().unwrap_or(0)
    );
    ExitCode::SUCCESS
}
