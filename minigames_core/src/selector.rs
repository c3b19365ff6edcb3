use rand::Rng;

use crate::error::{EngineError, EngineResult};

/// Sum of a weight table, rejecting tables that cannot define a distribution.
pub fn weight_total(weights: &[f64]) -> EngineResult<f64> {
    if weights.is_empty() {
        return Err(EngineError::InvalidWeights("weight table is empty".into()));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(EngineError::InvalidWeights(format!(
            "weight {bad} is not a finite non-negative number"
        )));
    }
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(EngineError::InvalidWeights(format!(
            "weights sum to {total}, expected a positive finite total"
        )));
    }
    Ok(total)
}

/// Draw one index with probability proportional to its weight.
pub fn select_weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> EngineResult<usize> {
    let total = weight_total(weights)?;
    let draw = rng.gen::<f64>() * total;
    index_for_draw(weights, total, draw)
}

/// Map a draw in `[0, total)` onto its bucket.
///
/// A draw equal to a cumulative boundary belongs to the next bucket. A draw at
/// or past `total` (possible only through rounding in `u * total`) clamps to
/// the last bucket with a positive weight.
pub fn index_for_draw(weights: &[f64], total: f64, draw: f64) -> EngineResult<usize> {
    if !(draw >= 0.0) {
        return Err(EngineError::WeightSumMismatch { draw, total });
    }
    let mut running = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        running += weight;
        if draw < running {
            return Ok(i);
        }
    }
    if running > 0.0 && draw >= running {
        if let Some(last) = weights.iter().rposition(|w| *w > 0.0) {
            return Ok(last);
        }
    }
    Err(EngineError::WeightSumMismatch { draw, total })
}
