use chrono::{DateTime, Utc};
use minigames_core::{EngineError, GameId, Setup};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayRequest {
    pub game_id: GameId,
    pub bet: f64,
    pub client_seed: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayResponse {
    pub game_id: GameId,
    pub server_seed_hash: String,
    pub nonce: u64,
    pub bet: f64,
    pub multiplier: f64,
    pub payout: f64,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NextBetRequest {
    pub current_bet: f64,
    pub increase: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NextBetResponse {
    pub bet: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifyResponse {
    pub server_seed_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameSummary {
    pub id: GameId,
    pub name: String,
    pub rtp: f64,
    pub hit_rate: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameDetail {
    pub id: GameId,
    pub name: String,
    pub rules: String,
    pub rtp: f64,
    pub payouts: Vec<f64>,
    pub setup: Setup,
    pub default_bank: f64,
    pub default_bet: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::Invalid(_) => 400,
            ApiError::Internal => 500,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ConfigNotFound(_) => ApiError::NotFound(err.to_string()),
            EngineError::InvalidBet(_) => ApiError::Invalid(err.to_string()),
            EngineError::InvalidWeights(_)
            | EngineError::InvalidConfig { .. }
            | EngineError::InvalidTable(_)
            | EngineError::WeightSumMismatch { .. } => ApiError::Internal,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_status() {
        assert_eq!(ApiError::from(EngineError::ConfigNotFound(9)).status_code(), 404);
        assert_eq!(ApiError::from(EngineError::InvalidBet(3.0)).status_code(), 400);
        let mismatch = EngineError::WeightSumMismatch { draw: 2.0, total: 1.0 };
        assert_eq!(ApiError::from(mismatch).status_code(), 500);
    }

    #[test]
    fn play_request_wire_format() {
        let req: PlayRequest =
            serde_json::from_str(r#"{"game_id":3,"bet":0.5,"client_seed":"abc"}"#).unwrap();
        assert_eq!(req.game_id, 3);
        assert_eq!(req.bet, 0.5);
        assert_eq!(req.client_seed, "abc");
    }
}
