use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    bet::is_on_ladder,
    config::{GameConfig, GameId},
    error::{EngineError, EngineResult},
    rng::ProvablyFairRng,
    selector::select_weighted_index,
    store::GameConfigStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRequest {
    pub game_id: GameId,
    pub bet: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub game_id: GameId,
    pub bucket: usize,  // pay table index the selector landed on
    pub candidate: f64, // payout of that bucket before the rtp gate
    pub payout_multiple: f64,
}

impl RoundOutcome {
    pub fn is_win(&self) -> bool {
        self.payout_multiple > 0.0
    }
}

/// A round scaled by the bet that was placed on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSettlement {
    pub outcome: RoundOutcome,
    pub bet: f64,
    pub payout: f64,
}

/// Pick a bucket by weight, then accept it with probability `rtp / payout`.
///
/// Over the non-zero buckets the expected multiple is `Σ P(i) * p_i * rtp / p_i`,
/// i.e. `rtp` times the chance of landing on a paying bucket. Zero buckets lose
/// without a second draw. `config` must already have passed validation, which
/// `GameConfigStore` guarantees for everything it hands out.
pub(crate) fn resolve_round<R: Rng + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
) -> EngineResult<RoundOutcome> {
    let bucket = select_weighted_index(&config.weights, rng)?;
    let candidate = config
        .payouts
        .get(bucket)
        .copied()
        .ok_or_else(|| EngineError::InvalidConfig {
            game_id: config.id,
            reason: format!("bucket {bucket} has no payout"),
        })?;

    let payout_multiple = if candidate == 0.0 {
        0.0
    } else {
        let win_probability = config.rtp / candidate;
        if rng.gen::<f64>() < win_probability {
            candidate
        } else {
            0.0
        }
    };

    Ok(RoundOutcome {
        game_id: config.id,
        bucket,
        candidate,
        payout_multiple,
    })
}

/// Stateless entry point used by the front ends once per round.
#[derive(Debug, Clone)]
pub struct PayoutEngine {
    store: Arc<GameConfigStore>,
}

impl PayoutEngine {
    pub fn new(store: Arc<GameConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GameConfigStore {
        &self.store
    }

    pub fn play<R: Rng + ?Sized>(
        &self,
        game_id: GameId,
        rng: &mut R,
    ) -> EngineResult<RoundOutcome> {
        let config = self.store.get_config(game_id)?;
        resolve_round(config, rng)
    }

    /// Payout multiple for one round of `game_id`, 0 when the round loses.
    pub fn determine_win<R: Rng + ?Sized>(
        &self,
        game_id: GameId,
        rng: &mut R,
    ) -> EngineResult<f64> {
        Ok(self.play(game_id, rng)?.payout_multiple)
    }

    pub fn play_round<R: Rng + ?Sized>(
        &self,
        request: &RoundRequest,
        rng: &mut R,
    ) -> EngineResult<RoundSettlement> {
        if !is_on_ladder(request.bet) {
            return Err(EngineError::InvalidBet(request.bet));
        }
        let outcome = self.play(request.game_id, rng)?;
        Ok(RoundSettlement {
            outcome,
            bet: request.bet,
            payout: outcome.payout_multiple * request.bet,
        })
    }
}

/// Convenience: play a round drawing from the seeded provably-fair stream.
pub fn play_with_seeds(
    engine: &PayoutEngine,
    game_id: GameId,
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
) -> EngineResult<RoundOutcome> {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    engine.play(game_id, &mut rng)
}

/// Verify that a reported multiple matches what the revealed seeds produce.
pub fn verify_round(
    engine: &PayoutEngine,
    game_id: GameId,
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    expected_multiple: f64,
) -> EngineResult<bool> {
    let outcome = play_with_seeds(engine, game_id, server_seed, client_seed, nonce)?;
    Ok(outcome.payout_multiple == expected_multiple)
}
