//! Cosmetic runner skins for coins

use crate::error::{GameError, Result};
use crate::wallet::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    /// Texture key drawn for the runner when equipped
    pub texture: &'static str,
}

pub const CATALOG: &[ShopItem] = &[
    ShopItem {
        id: "runner_blue",
        name: "Blue Alien",
        price: 25,
        texture: "player_blue",
    },
    ShopItem {
        id: "runner_pink",
        name: "Pink Alien",
        price: 50,
        texture: "player_pink",
    },
    ShopItem {
        id: "runner_yellow",
        name: "Yellow Alien",
        price: 100,
        texture: "player_yellow",
    },
];

pub fn find_item(id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == id)
}

/// What a shop click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    Purchased,
    Equipped,
}

/// Buy the item if it is locked, otherwise equip it
pub fn purchase_or_equip(wallet: &mut Wallet, id: &str) -> Result<ShopAction> {
    let item = find_item(id).ok_or_else(|| GameError::UnknownItem(id.to_string()))?;
    if wallet.is_unlocked(item.id) {
        wallet.equip(item.id)?;
        log::info!("Equipped {}", item.name);
        return Ok(ShopAction::Equipped);
    }

    wallet.spend(item.price)?;
    wallet.unlock(item.id);
    wallet.equip(item.id)?;
    log::info!("Purchased {} for {} coins", item.name, item.price);
    Ok(ShopAction::Purchased)
}

/// Texture key for the runner given what is equipped
pub fn runner_texture(wallet: &Wallet) -> &'static str {
    wallet
        .equipped()
        .and_then(find_item)
        .map(|item| item.texture)
        .unwrap_or(crate::assets::PLAYER)
}
