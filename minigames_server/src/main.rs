use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use rand::Rng;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use minigames_core::{
    calculate_hit_rate, derive_hash_hex, is_on_ladder, next_bet, EngineError, GameConfigStore,
    GameId, PayoutEngine, ProvablyFairRng, RoundRequest,
};
use minigames_shared::{
    ApiError, ErrorResponse, GameDetail, GameSummary, NextBetRequest, NextBetResponse,
    PlayRequest, PlayResponse, VerifyResponse,
};

#[derive(Parser)]
#[command(name = "minigames-server", about = "Round service for the mini-games front ends")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BIND", default_value = "127.0.0.1:8080")]
    bind: String,
    /// Catalogue JSON file, built-in games when omitted
    #[arg(long, env = "CATALOGUE_PATH")]
    catalogue: Option<PathBuf>,
    /// Secret seed for the provably-fair stream, random when omitted
    #[arg(long, env = "SERVER_SEED", hide_env_values = true)]
    server_seed: Option<String>,
}

struct AppState {
    engine: PayoutEngine,
    server_seed: String,
    server_seed_hash: String,
    nonce: AtomicU64,
}

impl AppState {
    fn new(store: GameConfigStore, server_seed: String) -> Self {
        Self {
            engine: PayoutEngine::new(Arc::new(store)),
            server_seed_hash: derive_hash_hex(server_seed.as_bytes()),
            server_seed,
            nonce: AtomicU64::new(0),
        }
    }
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(err: EngineError) -> Rejection {
    let api = ApiError::from(err.clone());
    let status =
        StatusCode::from_u16(api.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(%err, "engine failure");
    } else {
        debug!(%err, "rejected request");
    }
    (status, Json(ErrorResponse { error: api.to_string() }))
}

async fn route_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameSummary>> {
    Json(
        state
            .engine
            .store()
            .games()
            .map(|game| GameSummary {
                id: game.id,
                name: game.name.clone(),
                rtp: game.rtp,
                hit_rate: calculate_hit_rate(game),
            })
            .collect(),
    )
}

async fn route_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<GameId>,
) -> Result<Json<GameDetail>, Rejection> {
    let store = state.engine.store();
    let game = store.get_config(game_id).map_err(reject)?;
    let table = store.table();
    Ok(Json(GameDetail {
        id: game.id,
        name: game.name.clone(),
        rules: game.rules.clone(),
        rtp: game.rtp,
        payouts: game.payouts.clone(),
        setup: game.setup.clone(),
        default_bank: table.bank,
        default_bet: table.bet,
    }))
}

async fn route_round(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<PlayResponse>, Rejection> {
    // a rejected request must not consume a nonce
    if !is_on_ladder(req.bet) {
        return Err(reject(EngineError::InvalidBet(req.bet)));
    }
    state.engine.store().get_config(req.game_id).map_err(reject)?;

    let nonce = state.nonce.fetch_add(1, Ordering::Relaxed) + 1;
    let mut rng = ProvablyFairRng::new(&state.server_seed, &req.client_seed, nonce);
    let request = RoundRequest {
        game_id: req.game_id,
        bet: req.bet,
    };
    let settled = state.engine.play_round(&request, &mut rng).map_err(reject)?;
    debug!(
        game_id = req.game_id,
        nonce,
        bucket = settled.outcome.bucket,
        multiplier = settled.outcome.payout_multiple,
        "round settled"
    );

    Ok(Json(PlayResponse {
        game_id: req.game_id,
        server_seed_hash: state.server_seed_hash.clone(),
        nonce,
        bet: settled.bet,
        multiplier: settled.outcome.payout_multiple,
        payout: settled.payout,
        ts: chrono::Utc::now(),
    }))
}

async fn route_next_bet(
    Json(req): Json<NextBetRequest>,
) -> Result<Json<NextBetResponse>, Rejection> {
    let bet = next_bet(req.current_bet, req.increase).map_err(reject)?;
    Ok(Json(NextBetResponse { bet }))
}

async fn route_verify(State(state): State<Arc<AppState>>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        server_seed_hash: state.server_seed_hash.clone(),
    })
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/games", get(route_games))
        .route("/games/:id", get(route_game))
        .route("/round", post(route_round))
        .route("/bet/next", post(route_next_bet))
        .route("/verify", get(route_verify))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let store = match &args.catalogue {
        Some(path) => GameConfigStore::from_path(path)?,
        None => GameConfigStore::builtin()?,
    };
    info!(games = store.len(), "catalogue loaded");

    let server_seed = args
        .server_seed
        .unwrap_or_else(|| hex::encode(rand::thread_rng().gen::<[u8; 32]>()));
    let state = Arc::new(AppState::new(store, server_seed));
    info!(server_seed_hash = %state.server_seed_hash, "server seed committed");

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("listening on {}", args.bind);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
