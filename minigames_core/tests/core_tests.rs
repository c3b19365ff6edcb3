use std::sync::Arc;

use minigames_core::{
    calculate_hit_rate, effective_rtp, next_bet, select_weighted_index, simulate, Catalogue,
    EngineError, GameConfig, GameConfigStore, PayoutEngine, ProvablyFairRng, Setup, TableDefaults,
};
use rand::{rngs::StdRng, SeedableRng};

const ROUNDS: u64 = 200_000;

fn game(id: u32, rtp: f64, payouts: Vec<f64>, weights: Vec<f64>) -> GameConfig {
    GameConfig {
        id,
        name: format!("game {id}"),
        rules: String::new(),
        rtp,
        payouts,
        weights,
        setup: Setup::BombTimer {
            time_options: vec![1, 2, 3],
        },
    }
}

fn engine(games: Vec<GameConfig>) -> PayoutEngine {
    let store = GameConfigStore::from_catalogue(Catalogue {
        table: TableDefaults::default(),
        games,
    })
    .unwrap();
    PayoutEngine::new(Arc::new(store))
}

#[test]
fn rtp_converges_to_target() {
    let payouts = vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0];
    let weights = vec![20.0, 15.0, 8.0, 4.0, 2.0, 1.0];
    let engine = engine(vec![game(1, 0.95, payouts, weights)]);
    let mut rng = StdRng::seed_from_u64(2024);
    let report = simulate(&engine, 1, ROUNDS, &mut rng).unwrap();
    let err = (report.empirical_rtp() - 0.95).abs();
    assert!(
        err < 5.0 * report.standard_error(),
        "rtp {} vs 0.95 (se {})",
        report.empirical_rtp(),
        report.standard_error()
    );
}

#[test]
fn builtin_games_converge_to_effective_rtp() {
    let engine = PayoutEngine::new(Arc::new(GameConfigStore::builtin().unwrap()));
    let mut rng = StdRng::seed_from_u64(7);
    let configs: Vec<GameConfig> = engine.store().games().cloned().collect();
    for config in configs {
        let report = simulate(&engine, config.id, ROUNDS, &mut rng).unwrap();
        let expected = effective_rtp(&config);
        assert!(
            (report.empirical_rtp() - expected).abs() < 5.0 * report.standard_error(),
            "game {} rtp {} vs {}",
            config.id,
            report.empirical_rtp(),
            expected
        );
    }
}

#[test]
fn zero_payout_buckets_never_pay() {
    let engine = engine(vec![game(2, 1.0, vec![0.0, 2.0, 0.0], vec![3.0, 1.0, 2.0])]);
    let mut rng = StdRng::seed_from_u64(3);
    let report = simulate(&engine, 2, 50_000, &mut rng).unwrap();
    assert!(report.buckets[0].selected > 0);
    assert_eq!(report.buckets[0].won, 0);
    assert_eq!(report.buckets[2].won, 0);
}

#[test]
fn conditional_win_rate_matches_acceptance_probability() {
    let config = game(3, 0.9, vec![0.5, 1.0, 2.0, 5.0, 20.0], vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    let engine = engine(vec![config.clone()]);
    let mut rng = StdRng::seed_from_u64(99);
    let report = simulate(&engine, 3, ROUNDS, &mut rng).unwrap();
    for (i, bucket) in report.buckets.iter().enumerate() {
        let expected = config.acceptance_probability(i);
        assert_eq!(expected, (0.9 / bucket.payout).min(1.0));
        let n = bucket.selected as f64;
        let tolerance = 5.0 * (expected * (1.0 - expected) / n).sqrt() + 1e-9;
        assert!(
            (bucket.win_rate() - expected).abs() <= tolerance,
            "bucket {i} win rate {} vs {expected}",
            bucket.win_rate()
        );
    }
}

#[test]
fn empirical_hit_rate_matches_theory() {
    let config = game(4, 0.5, vec![0.0, 2.0], vec![1.0, 1.0]);
    assert_eq!(calculate_hit_rate(&config), 12.5);
    let engine = engine(vec![config]);
    let mut rng = StdRng::seed_from_u64(5);
    let report = simulate(&engine, 4, ROUNDS, &mut rng).unwrap();
    // se of a 12.5% proportion over 200k rounds is ~0.074 points
    assert!((report.hit_rate() - 12.5).abs() < 0.4, "hit rate {}", report.hit_rate());
}

#[test]
fn selector_ratio() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut counts = [0u64; 3];
    for _ in 0..ROUNDS {
        counts[select_weighted_index(&[1.0, 0.0, 3.0], &mut rng).unwrap()] += 1;
    }
    assert_eq!(counts[1], 0);
    let ratio = counts[2] as f64 / counts[0] as f64;
    assert!((ratio - 3.0).abs() < 0.1, "ratio {ratio}");
}

#[test]
fn bet_ladder_boundaries() {
    assert_eq!(next_bet(0.1, false), Ok(0.1));
    assert_eq!(next_bet(500.0, true), Ok(500.0));
    assert_eq!(next_bet(10.0, true), Ok(20.0));
    assert_eq!(next_bet(10.0, false), Ok(5.0));
    assert_eq!(next_bet(7.0, true), Err(EngineError::InvalidBet(7.0)));
}

#[test]
fn invalid_configs_are_rejected_at_load() {
    let zero_weights = Catalogue {
        table: TableDefaults::default(),
        games: vec![game(5, 0.9, vec![0.0, 2.0, 5.0], vec![0.0, 0.0, 0.0])],
    };
    assert!(matches!(
        GameConfigStore::from_catalogue(zero_weights),
        Err(EngineError::InvalidWeights(_))
    ));

    let mismatched = Catalogue {
        table: TableDefaults::default(),
        games: vec![game(6, 0.9, vec![0.0, 2.0], vec![1.0])],
    };
    assert!(matches!(
        GameConfigStore::from_catalogue(mismatched),
        Err(EngineError::InvalidConfig { game_id: 6, .. })
    ));
}

#[test]
fn provably_fair_rounds_repeat() {
    let engine = PayoutEngine::new(Arc::new(GameConfigStore::builtin().unwrap()));
    for nonce in 0..100u64 {
        let mut a = ProvablyFairRng::new("server", "client", nonce);
        let mut b = ProvablyFairRng::new("server", "client", nonce);
        assert_eq!(engine.play(1, &mut a).unwrap(), engine.play(1, &mut b).unwrap());
    }
}
