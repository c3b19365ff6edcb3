//! Pay table diagnostics: theoretical hit rate and RTP, plus Monte Carlo runs
//! used to check a configured table against its targets.

use rand::Rng;
use serde::Serialize;

use crate::{
    config::{GameConfig, GameId},
    engine::PayoutEngine,
    error::EngineResult,
};

/// Percentage of rounds expected to pay anything.
///
/// `100 * Σ P(i) * min(1, rtp / p_i)`; zero-payout buckets contribute nothing.
pub fn calculate_hit_rate(config: &GameConfig) -> f64 {
    100.0
        * (0..config.payouts.len())
            .map(|i| config.bucket_probability(i) * config.acceptance_probability(i))
            .sum::<f64>()
}

/// Expected multiple per round. Equals `rtp` unless a payout sits below it.
pub fn effective_rtp(config: &GameConfig) -> f64 {
    config
        .payouts
        .iter()
        .enumerate()
        .map(|(i, payout)| config.bucket_probability(i) * payout * config.acceptance_probability(i))
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub payout: f64,
    pub selected: u64,
    pub won: u64,
}

impl BucketStats {
    pub fn win_rate(&self) -> f64 {
        if self.selected == 0 {
            0.0
        } else {
            self.won as f64 / self.selected as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub game_id: GameId,
    pub rounds: u64,
    pub wins: u64,
    pub total_returned: f64,
    total_returned_sq: f64,
    pub buckets: Vec<BucketStats>,
}

impl SimulationReport {
    pub fn empirical_rtp(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_returned / self.rounds as f64
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            100.0 * self.wins as f64 / self.rounds as f64
        }
    }

    /// Standard error of `empirical_rtp`.
    pub fn standard_error(&self) -> f64 {
        if self.rounds < 2 {
            return 0.0;
        }
        let n = self.rounds as f64;
        let mean = self.total_returned / n;
        let variance = (self.total_returned_sq / n - mean * mean).max(0.0) * n / (n - 1.0);
        (variance / n).sqrt()
    }
}

/// Play `rounds` rounds of one game at unit bet and tally the results.
pub fn simulate<R: Rng + ?Sized>(
    engine: &PayoutEngine,
    game_id: GameId,
    rounds: u64,
    rng: &mut R,
) -> EngineResult<SimulationReport> {
    let config = engine.store().get_config(game_id)?;
    let mut report = SimulationReport {
        game_id,
        rounds,
        wins: 0,
        total_returned: 0.0,
        total_returned_sq: 0.0,
        buckets: config
            .payouts
            .iter()
            .map(|payout| BucketStats {
                payout: *payout,
                ..Default::default()
            })
            .collect(),
    };

    for _ in 0..rounds {
        let outcome = engine.play(game_id, rng)?;
        let bucket = &mut report.buckets[outcome.bucket];
        bucket.selected += 1;
        if outcome.is_win() {
            bucket.won += 1;
            report.wins += 1;
            report.total_returned += outcome.payout_multiple;
            report.total_returned_sq += outcome.payout_multiple * outcome.payout_multiple;
        }
    }
    Ok(report)
}
