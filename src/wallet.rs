//! Coin balance and owned cosmetics
//!
//! Persisted as JSON. A missing or corrupt file starts an empty wallet.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wallet {
    pub coins: u64,
    pub unlocked: BTreeSet<String>,
    /// Equipped cosmetic id, default look when `None`
    pub equipped: Option<String>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> u64 {
        self.coins
    }

    pub fn earn(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Deduct `price`, or fail leaving the balance untouched
    pub fn spend(&mut self, price: u64) -> Result<()> {
        if price > self.coins {
            return Err(GameError::InsufficientFunds {
                price,
                balance: self.coins,
            });
        }
        self.coins -= price;
        Ok(())
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Returns `false` if it was already owned
    pub fn unlock(&mut self, id: &str) -> bool {
        self.unlocked.insert(id.to_string())
    }

    /// Equip an owned item
    pub fn equip(&mut self, id: &str) -> Result<()> {
        if !self.is_unlocked(id) {
            return Err(GameError::UnknownItem(id.to_string()));
        }
        self.equipped = Some(id.to_string());
        Ok(())
    }

    pub fn equipped(&self) -> Option<&str> {
        self.equipped.as_deref()
    }

    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No wallet found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("Could not read wallet from {}: {e}", path.display());
                return Self::new();
            }
        };
        match serde_json::from_str::<Wallet>(&json) {
            Ok(wallet) => {
                log::info!("Loaded wallet: {} coins", wallet.coins);
                wallet
            }
            Err(e) => {
                log::warn!("Corrupt wallet in {}: {e}; starting fresh", path.display());
                Self::new()
            }
        }
    }

    /// Overwrite `path`. Failures are logged only.
    pub fn save(&self, path: &Path) {
        let result = serde_json::to_string_pretty(self)
            .map_err(GameError::from)
            .and_then(|json| fs::write(path, json).map_err(GameError::from));
        match result {
            Ok(()) => log::info!("Wallet saved ({} coins)", self.coins),
            Err(e) => log::warn!("Could not write wallet to {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_checks_balance() {
        let mut wallet = Wallet::new();
        wallet.earn(30);
        assert!(wallet.spend(20).is_ok());
        assert_eq!(wallet.balance(), 10);

        let err = wallet.spend(11).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientFunds {
                price: 11,
                balance: 10
            }
        ));
        assert_eq!(wallet.balance(), 10);
    }

    #[test]
    fn test_equip_requires_unlock() {
        let mut wallet = Wallet::new();
        assert!(wallet.equip("runner_blue").is_err());
        assert!(wallet.unlock("runner_blue"));
        assert!(!wallet.unlock("runner_blue"));
        wallet.equip("runner_blue").unwrap();
        assert_eq!(wallet.equipped(), Some("runner_blue"));
    }

    #[test]
    fn test_persistence() {
        let path = std::env::temp_dir().join(format!(
            "endless_runner_{}_wallet.json",
            std::process::id()
        ));
        let mut wallet = Wallet::new();
        wallet.earn(12);
        wallet.unlock("runner_pink");
        wallet.save(&path);
        assert_eq!(Wallet::load(&path), wallet);

        fs::write(&path, "not json").unwrap();
        assert_eq!(Wallet::load(&path), Wallet::new());
        let _ = fs::remove_file(&path);
    }
}
