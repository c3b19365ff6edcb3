use crate::error::{EngineError, EngineResult};

/// Allowed bet sizes, shared by every game.
pub const BET_LADDER: [f64; 12] = [
    0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0,
];

pub fn is_on_ladder(bet: f64) -> bool {
    BET_LADDER.contains(&bet)
}

/// Step one rung up or down the ladder. Stepping past either end keeps the
/// current bet.
pub fn next_bet(current: f64, increase: bool) -> EngineResult<f64> {
    let index = BET_LADDER
        .iter()
        .position(|b| *b == current)
        .ok_or(EngineError::InvalidBet(current))?;
    let next = if increase {
        index.checked_add(1)
    } else {
        index.checked_sub(1)
    };
    Ok(next
        .and_then(|i| BET_LADDER.get(i).copied())
        .unwrap_or(current))
}
