use axum::http::StatusCode;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use oddslab_core::{
    derive_hash_hex, hand_total, lucky9::Deck, run_suite, spin_once, ColorDice, Detail, Game,
    GameConfig, GameKind, Lucky9, Outcome, ProvablyFairRng, SimError, SlotMachine,
};
use oddslab_shared::{
    round2, ApiError, DrawRequest, DrawResponse, ErrorBody, GameInfo, Lucky9Request,
    Lucky9Response, PeekResponse, Proof, ResolveRequest, RollRequest, RollResponse,
    SimulateRequest, SimulateResponse, SlotSpinRequest, SlotSpinResponse, VerifyResponse,
};

const DEFAULT_MAX_TRIALS: usize = 100_000;

struct AppState {
    server_seed: String,
    server_seed_hash: String,
    nonce: AtomicU64,
    max_trials: usize,
}

impl AppState {
    fn new(server_seed: String, max_trials: usize) -> Self {
        Self {
            server_seed_hash: derive_hash_hex(server_seed.as_bytes()),
            server_seed,
            nonce: AtomicU64::new(0),
            max_trials,
        }
    }

    /// Fresh generator for one request; every call takes the next nonce.
    fn next_rng(&self, client_seed: &str) -> (ProvablyFairRng, Proof) {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed) + 1;
        let rng = ProvablyFairRng::new(self.server_seed.as_str(), client_seed, nonce);
        let proof = Proof {
            server_seed_hash: self.server_seed_hash.clone(),
            client_seed: client_seed.to_string(),
            nonce,
        };
        (rng, proof)
    }
}

struct HttpError(ApiError);

impl From<ApiError> for HttpError {
    fn from(e: ApiError) -> Self {
        HttpError(e)
    }
}

impl From<SimError> for HttpError {
    fn from(e: SimError) -> Self {
        HttpError(e.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApiError::Invalid(msg) => {
                warn!("rejected request: {msg}");
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type HttpResult<T> = Result<Json<T>, HttpError>;

fn lucky9_response(
    game: &Lucky9,
    bet_amount: f64,
    outcome: Outcome,
    deck: Option<Deck>,
    proof: Option<Proof>,
) -> Result<Lucky9Response, HttpError> {
    let Detail::Cards {
        player_cards,
        dealer_cards,
        player_total,
        dealer_total,
        tie,
    } = outcome.detail
    else {
        error!("lucky9 produced a non-card outcome");
        return Err(ApiError::Internal.into());
    };
    Ok(Lucky9Response {
        player_cards,
        dealer_cards,
        player_total,
        dealer_total,
        player_won: outcome.player_won,
        tie,
        payout: round2(outcome.payout),
        player_profit: round2(outcome.player_profit),
        house_profit: round2(outcome.house_profit),
        payout_multiplier: game.payout_multiplier(),
        bet_amount,
        deck,
        proof,
    })
}

async fn route_games() -> HttpResult<Vec<GameInfo>> {
    let games = GameKind::all_defaults()
        .into_iter()
        .map(|kind| {
            let defaults = GameConfig::new(1.0, kind);
            let label = defaults.build()?.name().to_string();
            Ok(GameInfo {
                key: defaults.kind.key().to_string(),
                label,
                defaults,
            })
        })
        .collect::<Result<Vec<_>, SimError>>()?;
    Ok(Json(games))
}

async fn route_verify(State(state): State<Arc<AppState>>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        server_seed_hash: state.server_seed_hash.clone(),
    })
}

async fn route_roll(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RollRequest>,
) -> HttpResult<RollResponse> {
    let bet_color = req.color()?;
    let mode = req.mode();
    let game = ColorDice::new(req.bet_amount, bet_color, mode, req.chosen_prob)?;
    let (mut rng, proof) = state.next_rng(&req.client_seed);
    let outcome = game.play(&mut rng);
    let Detail::ColorDice {
        dice,
        matches,
        probabilities,
        ..
    } = outcome.detail
    else {
        error!("color dice produced an unexpected outcome");
        return Err(ApiError::Internal.into());
    };
    Ok(Json(RollResponse {
        dice,
        matches,
        payout: round2(outcome.payout),
        player_profit: round2(outcome.player_profit),
        house_profit: round2(outcome.house_profit),
        mode,
        bet_color,
        probabilities,
        proof,
    }))
}

async fn route_lucky9(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Lucky9Request>,
) -> HttpResult<Lucky9Response> {
    let game = Lucky9::new(req.bet_amount, req.payout_multiplier)?;
    let (mut rng, proof) = state.next_rng(&req.client_seed);
    let outcome = game.play(&mut rng);
    Ok(Json(lucky9_response(
        &game,
        req.bet_amount,
        outcome,
        None,
        Some(proof),
    )?))
}

async fn route_lucky9_peek(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Lucky9Request>,
) -> HttpResult<PeekResponse> {
    // reject a bad stake before dealing
    Lucky9::new(req.bet_amount, req.payout_multiplier)?;
    let (mut rng, proof) = state.next_rng(&req.client_seed);
    let (player_cards, deck) = Lucky9::peek(&mut rng);
    Ok(Json(PeekResponse {
        player_total: hand_total(&player_cards),
        player_cards,
        deck,
        proof,
    }))
}

async fn route_lucky9_draw(Json(req): Json<DrawRequest>) -> HttpResult<DrawResponse> {
    if req.deck.is_empty() {
        return Err(ApiError::Invalid("deck empty".into()).into());
    }
    let (player_cards, card, deck) = Lucky9::hit(&req.player_cards, &req.deck)?;
    Ok(Json(DrawResponse {
        player_total: hand_total(&player_cards),
        player_cards,
        deck,
        drawn: vec![card],
    }))
}

async fn route_lucky9_resolve(Json(req): Json<ResolveRequest>) -> HttpResult<Lucky9Response> {
    if req.player_cards.len() < 2 {
        return Err(ApiError::Invalid("need at least two player cards".into()).into());
    }
    let game = Lucky9::new(req.bet_amount, req.payout_multiplier)?;
    let (outcome, deck) = game.finish(&req.player_cards, &req.dealer_cards, &req.deck)?;
    Ok(Json(lucky9_response(
        &game,
        req.bet_amount,
        outcome,
        Some(deck),
        None,
    )?))
}

async fn route_slot_spin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SlotSpinRequest>,
) -> HttpResult<SlotSpinResponse> {
    let machine = SlotMachine::new(req.bet_amount)?;
    let (mut rng, proof) = state.next_rng(&req.client_seed);
    let outcome = spin_once(&mut rng, &machine);
    let Detail::Slot { spin, multiplier } = outcome.detail else {
        error!("slot machine produced an unexpected outcome");
        return Err(ApiError::Internal.into());
    };
    Ok(Json(SlotSpinResponse {
        spin,
        multiplier,
        payout: round2(outcome.payout),
        player_profit: round2(outcome.player_profit),
        house_profit: round2(outcome.house_profit),
        proof,
    }))
}

async fn route_simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> HttpResult<SimulateResponse> {
    if req.num_simulations == 0 || req.num_simulations > state.max_trials {
        return Err(ApiError::Invalid(format!(
            "num_simulations must be between 1 and {}",
            state.max_trials
        ))
        .into());
    }
    let configs = req.configs()?;
    let (rng, proof) = state.next_rng(&req.client_seed);
    info!(
        games = configs.len(),
        trials = req.num_simulations,
        nonce = proof.nonce,
        "running simulation"
    );
    let count = req.num_simulations;
    let entries = tokio::task::spawn_blocking(move || run_suite(&configs, count, &rng))
        .await
        .map_err(|e| {
            error!("simulation task failed: {e}");
            ApiError::Internal
        })??;
    Ok(Json(SimulateResponse::from_entries(&req, &entries, proof)))
}

fn max_trials_from_env() -> anyhow::Result<usize> {
    match std::env::var("MAX_TRIALS") {
        Ok(raw) => Ok(raw.parse()?),
        Err(_) => Ok(DEFAULT_MAX_TRIALS),
    }
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/games", get(route_games))
        .route("/verify", get(route_verify))
        .route("/api/roll", post(route_roll))
        .route("/api/lucky9", post(route_lucky9))
        .route("/api/lucky9/peek", post(route_lucky9_peek))
        .route("/api/lucky9/draw", post(route_lucky9_draw))
        .route("/api/lucky9/resolve", post(route_lucky9_resolve))
        .route("/api/slot/spin", post(route_slot_spin))
        .route("/simulate", post(route_simulate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let server_seed = std::env::var("SERVER_SEED").unwrap_or_else(|_| {
        warn!("SERVER_SEED not set, using the development seed");
        "dev-server-seed".to_string()
    });
    let state = Arc::new(AppState::new(server_seed, max_trials_from_env()?));
    info!(
        server_seed_hash = %state.server_seed_hash,
        max_trials = state.max_trials,
        "seed committed"
    );

    let addr = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
