//! Texture lookup by string key
//!
//! The core never loads image data. It asks a `TextureProvider` for an
//! opaque handle and skips drawing when none comes back.

use std::collections::HashMap;

pub const PLAYER: &str = "player";
pub const GROUND: &str = "Ground_Sand";
pub const POWER_UP: &str = "powerUp";
pub const COIN: &str = "Coin";

pub const SHORT_OBSTACLE_SKINS: &[&str] = &[
    "obstacle_small_GreenMonster_Angry",
    "obstacle_small_Creature",
    "obstacle_small_GreenMonster_Poker",
];

pub const TALL_OBSTACLE_SKINS: &[&str] = &[
    "obstacle_tall_OrangeMonster_Sad",
    "obstacle_tall_GreenMonster_Poker",
    "obstacle_tall_OrangeMonster_Angry",
];

pub const WIDE_OBSTACLE_SKINS: &[&str] = &["obstacle_wide"];

/// Opaque handle owned by the presentation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

pub trait TextureProvider {
    fn get_texture(&self, name: &str) -> Option<TextureHandle>;
}

/// In-memory name to handle table
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, TextureHandle>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to `handle`, replacing any earlier entry
    pub fn register(&mut self, name: impl Into<String>, handle: TextureHandle) {
        let name = name.into();
        log::debug!("Registered texture {name} -> {:?}", handle);
        self.textures.insert(name, handle);
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureProvider for TextureRegistry {
    fn get_texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let mut registry = TextureRegistry::new();
        assert!(registry.get_texture(PLAYER).is_none());

        registry.register(PLAYER, TextureHandle(7));
        registry.register(PLAYER, TextureHandle(8));
        assert_eq!(registry.get_texture(PLAYER), Some(TextureHandle(8)));
        assert_eq!(registry.len(), 1);
    }
}
