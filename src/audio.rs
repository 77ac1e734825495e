//! Sound cues
//!
//! The game plays sounds by key through a `SoundBackend`. A missing key is
//! a warning, never an error.

use std::collections::HashSet;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Runner leaves the ground or air-jumps
    Jump,
    /// Runner hits an obstacle
    Crash,
    /// Menu button accepted
    UiClick,
    /// Power-up collected
    Pickup,
    /// New top score
    HighScore,
}

impl SoundEffect {
    /// Backend lookup key
    pub fn key(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Crash => "crash",
            SoundEffect::UiClick => "UI_click",
            SoundEffect::Pickup => "pickup",
            SoundEffect::HighScore => "highscore",
        }
    }
}

/// Plays a loaded sound by key. Returns `false` when the key is unknown.
pub trait SoundBackend {
    fn play_sound(&mut self, name: &str, volume: f32) -> bool;
}

/// Backend that accepts every key and plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl SoundBackend for NullAudio {
    fn play_sound(&mut self, _name: &str, _volume: f32) -> bool {
        true
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn SoundBackend>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    warned: HashSet<&'static str>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            warned: HashSet::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let key = effect.key();
        if !self.backend.play_sound(key, vol) && self.warned.insert(key) {
            log::warn!("Sound '{key}' is not loaded");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every key played; rejects keys in `missing`
    #[derive(Clone, Default)]
    pub(crate) struct RecordingAudio {
        pub played: Rc<RefCell<Vec<String>>>,
        pub missing: Vec<&'static str>,
    }

    impl SoundBackend for RecordingAudio {
        fn play_sound(&mut self, name: &str, _volume: f32) -> bool {
            if self.missing.contains(&name) {
                return false;
            }
            self.played.borrow_mut().push(name.to_string());
            true
        }
    }

    #[test]
    fn test_plays_by_key() {
        let backend = RecordingAudio::default();
        let played = backend.played.clone();
        let mut audio = AudioManager::new(Box::new(backend));

        audio.play(SoundEffect::Jump);
        audio.play(SoundEffect::UiClick);
        assert_eq!(*played.borrow(), vec!["jump", "UI_click"]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let backend = RecordingAudio::default();
        let played = backend.played.clone();
        let mut audio = AudioManager::new(Box::new(backend));

        audio.set_muted(true);
        audio.play(SoundEffect::Crash);
        assert!(played.borrow().is_empty());

        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEffect::Crash);
        assert!(played.borrow().is_empty());
    }

    #[test]
    fn test_missing_key_is_tolerated() {
        let backend = RecordingAudio {
            missing: vec!["pickup"],
            ..Default::default()
        };
        let played = backend.played.clone();
        let mut audio = AudioManager::new(Box::new(backend));

        audio.play(SoundEffect::Pickup);
        audio.play(SoundEffect::Pickup);
        audio.play(SoundEffect::Jump);
        assert_eq!(*played.borrow(), vec!["jump"]);
        assert!(audio.warned.contains("pickup"));
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::default();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }
}
