use std::sync::Arc;

use minigames_core::{GameConfigStore, PayoutEngine, ProvablyFairRng};

fn main() -> anyhow::Result<()> {
    // Example end-to-end round on the payout wheel
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let nonce = 1u64;
    let engine = PayoutEngine::new(Arc::new(GameConfigStore::builtin()?));
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    let outcome = engine.play(3, &mut rng)?;
    println!(
        "server_seed_hash={} bucket={} multiple={}",
        rng.server_seed_hash_hex(),
        outcome.bucket,
        outcome.payout_multiple
    );
    Ok(())
}
