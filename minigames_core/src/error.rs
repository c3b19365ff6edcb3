use thiserror::Error;

use crate::config::GameId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no configuration for game {0}")]
    ConfigNotFound(GameId),
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("invalid configuration for game {game_id}: {reason}")]
    InvalidConfig { game_id: GameId, reason: String },
    #[error("invalid table defaults: {0}")]
    InvalidTable(String),
    #[error("draw {draw} fell outside the cumulative weight {total}")]
    WeightSumMismatch { draw: f64, total: f64 },
    #[error("bet {0} is not on the bet ladder")]
    InvalidBet(f64),
}

/// Failure to turn a catalogue source into a usable store.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalogue: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}

pub type EngineResult<T> = Result<T, EngineError>;
