use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use minigames_core::{
    calculate_hit_rate, effective_rtp, next_bet, simulate, validate_catalogue, Catalogue,
    GameConfig, GameConfigStore, GameId, PayoutEngine, SimulationReport,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

#[derive(Parser)]
#[command(name = "minigames-cli", about = "Admin CLI for mini-game pay tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Catalogue JSON file, built-in games when omitted
    #[arg(long, value_parser, env = "CATALOGUE_PATH")]
    catalogue: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List games with their target RTP and theoretical hit rate
    Games,
    /// Validate a catalogue file and report every broken game
    Validate { path: PathBuf },
    /// Play N rounds of a game at unit bet and report the results
    Simulate {
        game_id: GameId,
        #[arg(default_value_t = 200_000)]
        rounds: u64,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Write per-bucket statistics to this CSV path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Step a bet one rung along the ladder
    NextBet {
        current: f64,
        /// Step down instead of up
        #[arg(long)]
        down: bool,
    },
}

fn load_store(path: Option<PathBuf>) -> anyhow::Result<GameConfigStore> {
    let store = match path {
        Some(path) => GameConfigStore::from_path(path)?,
        None => GameConfigStore::builtin()?,
    };
    Ok(store)
}

fn write_report<W: io::Write>(
    report: &SimulationReport,
    config: &GameConfig,
    out: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["bucket", "payout", "selected", "won", "win_rate", "expected_win_rate"])?;
    for (i, bucket) in report.buckets.iter().enumerate() {
        wtr.write_record(&[
            i.to_string(),
            bucket.payout.to_string(),
            bucket.selected.to_string(),
            bucket.won.to_string(),
            format!("{:.6}", bucket.win_rate()),
            format!("{:.6}", config.acceptance_probability(i)),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Games => {
            let store = load_store(cli.catalogue)?;
            for game in store.games() {
                println!(
                    "#{:>3} {:<20} rtp={:.4} effective_rtp={:.4} hit_rate={:.2}%",
                    game.id,
                    game.name,
                    game.rtp,
                    effective_rtp(game),
                    calculate_hit_rate(game)
                );
            }
        }
        Commands::Validate { path } => {
            let catalogue = Catalogue::from_path(&path)?;
            let issues = validate_catalogue(&catalogue);
            if issues.is_empty() {
                println!("{}: {} games ok", path.display(), catalogue.games.len());
            } else {
                for issue in &issues {
                    match issue.game_id {
                        Some(id) => println!("game {id}: {}", issue.error),
                        None => println!("table: {}", issue.error),
                    }
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Simulate {
            game_id,
            rounds,
            seed,
            csv,
        } => {
            let engine = PayoutEngine::new(Arc::new(load_store(cli.catalogue)?));
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let report = simulate(&engine, game_id, rounds, &mut rng)?;
            let config = engine.store().get_config(game_id)?;
            println!(
                "game={} rounds={} rtp={:.4} (target {:.4}, expected {:.4}, se {:.4}) \
                 hit_rate={:.2}% (expected {:.2}%)",
                game_id,
                report.rounds,
                report.empirical_rtp(),
                config.rtp,
                effective_rtp(config),
                report.standard_error(),
                report.hit_rate(),
                calculate_hit_rate(config)
            );
            if let Some(path) = csv {
                write_report(&report, config, std::fs::File::create(&path)?)?;
                info!("wrote bucket statistics to {}", path.display());
            }
        }
        Commands::NextBet { current, down } => {
            println!("{}", next_bet(current, !down)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_report_has_row_per_bucket() {
        let engine = PayoutEngine::new(Arc::new(GameConfigStore::builtin().unwrap()));
        let mut rng = StdRng::seed_from_u64(1);
        let report = simulate(&engine, 3, 1_000, &mut rng).unwrap();
        let config = engine.store().get_config(3).unwrap();

        let mut out = Vec::new();
        write_report(&report, config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + config.payouts.len());
        assert_eq!(lines[0], "bucket,payout,selected,won,win_rate,expected_win_rate");
        assert!(lines[1].starts_with("0,0,"));
    }

    #[test]
    fn cli_parses_simulate() {
        let cli =
            Cli::try_parse_from(["minigames-cli", "simulate", "3", "5000", "--seed", "9"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simulate {
                game_id: 3,
                rounds: 5000,
                seed: Some(9),
                csv: None
            }
        ));
    }
}
