pub mod analysis;
pub mod bet;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod selector;
pub mod store;

pub use crate::analysis::{
    calculate_hit_rate, effective_rtp, simulate, BucketStats, SimulationReport,
};
pub use crate::bet::{is_on_ladder, next_bet, BET_LADDER};
pub use crate::config::{GameConfig, GameId, Setup, TableDefaults, WheelValue};
pub use crate::engine::{
    play_with_seeds, verify_round, PayoutEngine, RoundOutcome, RoundRequest, RoundSettlement,
};
pub use crate::error::{CatalogueError, EngineError, EngineResult};
pub use crate::rng::{derive_hash_hex, ProvablyFairRng};
pub use crate::selector::{index_for_draw, select_weighted_index, weight_total};
pub use crate::store::{validate_catalogue, Catalogue, CatalogueIssue, GameConfigStore};
