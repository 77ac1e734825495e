//! Game settings and preferences
//!
//! Read from a JSON file at startup. Anything missing falls back to its
//! default; an unreadable or invalid file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::error::Result;
use crate::tuning::Tuning;

/// Default settings file next to the binary
pub const SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Simulation ===
    /// Fixed RNG seed; wall-clock seeded when absent
    pub seed: Option<u64>,
    pub tuning: Tuning,

    // === Persistence ===
    pub scores_path: PathBuf,
    pub wallet_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            screen_width: viewport.width,
            screen_height: viewport.height,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            seed: None,
            tuning: Tuning::default(),

            scores_path: PathBuf::from("scores.txt"),
            wallet_path: PathBuf::from("wallet.json"),
        }
    }
}

impl Settings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.screen_width, self.screen_height)
    }

    /// Configured seed, or one derived from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Parse settings JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from `path`, defaults on any failure
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {e})", path.display());
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Load settings from `path`, writing the defaults there first when no
    /// file exists yet
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Ok(Self::load(path));
        }
        let settings = Self::default();
        settings.save(path)?;
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
