//! Error types
//!
//! Only initialization and explicit wallet operations surface errors to the
//! caller. Asset, spawn geometry and persistence problems are logged and
//! swallowed where they happen.

use thiserror::Error;

/// Result type alias for game operations
pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    /// Configuration rejected during startup (fatal)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Purchase attempted without enough coins
    #[error("insufficient funds: price {price}, balance {balance}")]
    InsufficientFunds { price: u64, balance: u64 },

    /// Shop item id not in the catalog
    #[error("unknown shop item: {0}")]
    UnknownItem(String),
}

impl GameError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
