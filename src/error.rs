//! Error types shared by the board model, the search core and the config loader.

use thiserror::Error;

/// Errors raised at the board-model boundary and by the game controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid move at index {index}: {reason}")]
    InvalidMove { index: usize, reason: &'static str },

    #[error("it is not {0}'s turn")]
    NotYourTurn(crate::core::Side),

    #[error("game already over")]
    GameOver,

    #[error("invalid board '{context}': {reason}")]
    InvalidBoard { context: String, reason: String },

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// The only way a search can end without a result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("search cancelled")]
    Cancelled,
}

/// Invalid evaluator or search constants, or a config file that cannot be read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
