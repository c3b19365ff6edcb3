use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    bet::is_on_ladder,
    error::{EngineError, EngineResult},
    selector::weight_total,
};

pub type GameId = u32;

/// Pay table and presentation data for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub id: GameId,
    pub name: String,
    pub rules: String,
    pub rtp: f64,
    pub payouts: Vec<f64>, // multipliers, 0 = designed miss
    pub weights: Vec<f64>, // index-aligned with payouts
    pub setup: Setup,
}

/// Game-specific layout data. The payout engine never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Setup {
    Cups {
        cup_amount: u8,
    },
    HigherOrLower {
        values: Vec<String>,
        suits: Vec<String>,
    },
    BombTimer {
        time_options: Vec<u32>,
    },
    PayoutWheel {
        base_values: Vec<WheelValue>,
        double_values: Vec<WheelValue>,
    },
}

/// A wheel segment is either a multiplier or a text label such as "X2".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WheelValue {
    Multiplier(f64),
    Label(String),
}

impl GameConfig {
    /// Check the pay table invariants. Called once per game at load time.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |reason: String| EngineError::InvalidConfig {
            game_id: self.id,
            reason,
        };

        if !self.rtp.is_finite() || self.rtp <= 0.0 || self.rtp > 1.0 {
            return Err(invalid(format!("rtp {} is outside (0, 1]", self.rtp)));
        }
        if self.payouts.is_empty() {
            return Err(invalid("pay table is empty".into()));
        }
        if self.payouts.len() != self.weights.len() {
            return Err(invalid(format!(
                "{} payouts but {} weights",
                self.payouts.len(),
                self.weights.len()
            )));
        }
        if let Some(bad) = self.payouts.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(invalid(format!(
                "payout {bad} is not a finite non-negative multiplier"
            )));
        }
        weight_total(&self.weights)?;

        for payout in self.payouts.iter().filter(|p| **p > 0.0 && **p < self.rtp) {
            warn!(
                game_id = self.id,
                payout,
                rtp = self.rtp,
                "payout below rtp always wins; pay table looks misconfigured"
            );
        }
        Ok(())
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Probability of the selector landing on `bucket`.
    pub fn bucket_probability(&self, bucket: usize) -> f64 {
        let total = self.total_weight();
        match self.weights.get(bucket) {
            Some(weight) if total > 0.0 => weight / total,
            _ => 0.0,
        }
    }

    /// Probability that a selected `bucket` is accepted as a win.
    pub fn acceptance_probability(&self, bucket: usize) -> f64 {
        match self.payouts.get(bucket) {
            Some(payout) if *payout > 0.0 => (self.rtp / payout).min(1.0),
            _ => 0.0,
        }
    }
}

/// Bank and bet a fresh table starts with. Owned by the caller, never the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableDefaults {
    pub bank: f64,
    pub bet: f64,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            bank: 500.0,
            bet: 10.0,
        }
    }
}

impl TableDefaults {
    pub fn validate(&self) -> EngineResult<()> {
        if !self.bank.is_finite() || self.bank < 0.0 {
            return Err(EngineError::InvalidTable(format!(
                "bank {} must be a non-negative amount",
                self.bank
            )));
        }
        if !is_on_ladder(self.bet) {
            return Err(EngineError::InvalidTable(format!(
                "default bet {} is not on the bet ladder",
                self.bet
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_config(payouts: Vec<f64>, weights: Vec<f64>, rtp: f64) -> GameConfig {
    GameConfig {
        id: 99,
        name: "Sample".into(),
        rules: "Test table".into(),
        rtp,
        payouts,
        weights,
        setup: Setup::Cups { cup_amount: 3 },
    }
}
