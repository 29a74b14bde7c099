use chrono::{DateTime, Utc};
use oddslab_core::{
    error::check_bet, lucky9::Deck, ColorMode, DiceColor, GameConfig, GameKind, SimError, SuiteEntry, Symbol,
};
use serde::{Deserialize, Serialize};

/// Round a money amount to cents for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn default_one() -> f64 {
    1.0
}
fn default_table_bet() -> f64 {
    10.0
}
fn default_lucky9_multiplier() -> f64 {
    oddslab_core::lucky9::DEFAULT_PAYOUT_MULTIPLIER
}
fn default_color() -> String {
    "red".to_string()
}
fn default_mode() -> String {
    "fair".to_string()
}
fn default_chosen_prob() -> f64 {
    oddslab_core::color::DEFAULT_CHOSEN_PROB
}
fn default_num_simulations() -> usize {
    5000
}
fn default_tweaked_payout() -> f64 {
    oddslab_core::dice::REDUCED_PAYOUT_MULTIPLIER
}
fn default_weighted_prob() -> f64 {
    oddslab_core::dice::DEFAULT_PLAYER_WEIGHT
}
fn default_modified_payout() -> f64 {
    oddslab_core::dice::MODIFIED_PAYOUT_MULTIPLIER
}
fn default_normal_mean() -> f64 {
    5.0
}
fn default_normal_std() -> f64 {
    1.5
}

/// Seeds a round was played with. The server seed itself stays secret;
/// its hash is published so the round can be checked once it is revealed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Proof {
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RollRequest {
    #[serde(default = "default_color")]
    pub bet_color: String,
    #[serde(default = "default_one")]
    pub bet_amount: f64,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_chosen_prob")]
    pub chosen_prob: f64,
    #[serde(default)]
    pub client_seed: String,
}

impl RollRequest {
    pub fn color(&self) -> ApiResult<DiceColor> {
        DiceColor::parse(&self.bet_color)
            .ok_or_else(|| ApiError::Invalid("invalid bet color".into()))
    }

    pub fn mode(&self) -> ColorMode {
        ColorMode::parse(&self.mode)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RollResponse {
    pub dice: Vec<DiceColor>,
    pub matches: usize,
    pub payout: f64,
    pub player_profit: f64,
    pub house_profit: f64,
    pub mode: ColorMode,
    pub bet_color: DiceColor,
    pub probabilities: Vec<f64>,
    #[serde(flatten)]
    pub proof: Proof,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Lucky9Request {
    #[serde(default = "default_table_bet")]
    pub bet_amount: f64,
    #[serde(default = "default_lucky9_multiplier")]
    pub payout_multiplier: f64,
    #[serde(default)]
    pub client_seed: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Lucky9Response {
    pub player_cards: Vec<u8>,
    pub dealer_cards: Vec<u8>,
    pub player_total: u8,
    pub dealer_total: u8,
    pub player_won: bool,
    pub tie: bool,
    pub payout: f64,
    pub player_profit: f64,
    pub house_profit: f64,
    pub payout_multiplier: f64,
    pub bet_amount: f64,
    /// Deck left after the dealer was dealt; present for staged rounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Deck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PeekResponse {
    pub player_cards: Vec<u8>,
    pub player_total: u8,
    pub deck: Deck,
    pub proof: Proof,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DrawRequest {
    #[serde(default = "empty_deck")]
    pub deck: Deck,
    #[serde(default)]
    pub player_cards: Vec<u8>,
}

fn empty_deck() -> Deck {
    Deck(Vec::new())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DrawResponse {
    pub player_cards: Vec<u8>,
    pub player_total: u8,
    pub deck: Deck,
    pub drawn: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResolveRequest {
    #[serde(default = "default_table_bet")]
    pub bet_amount: f64,
    #[serde(default = "default_lucky9_multiplier")]
    pub payout_multiplier: f64,
    #[serde(default)]
    pub player_cards: Vec<u8>,
    #[serde(default)]
    pub dealer_cards: Vec<u8>,
    #[serde(default = "empty_deck")]
    pub deck: Deck,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlotSpinRequest {
    #[serde(default = "default_one")]
    pub bet_amount: f64,
    #[serde(default)]
    pub client_seed: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlotSpinResponse {
    pub spin: Vec<Symbol>,
    pub multiplier: f64,
    pub payout: f64,
    pub player_profit: f64,
    pub house_profit: f64,
    #[serde(flatten)]
    pub proof: Proof,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameInfo {
    pub key: String,
    pub label: String,
    pub defaults: GameConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SimulateRequest {
    /// Game keys, e.g. `"fair"` or `"slot_machine"`.
    pub games: Vec<String>,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,
    #[serde(default = "default_one")]
    pub bet_amount: f64,
    #[serde(default = "default_tweaked_payout")]
    pub tweaked_payout: f64,
    #[serde(default = "default_weighted_prob")]
    pub weighted_prob: f64,
    #[serde(default = "default_modified_payout")]
    pub modified_payout: f64,
    #[serde(default = "default_normal_mean")]
    pub normal_mean: f64,
    #[serde(default = "default_normal_std")]
    pub normal_std: f64,
    #[serde(default = "default_lucky9_multiplier")]
    pub lucky9_payout: f64,
    #[serde(default)]
    pub client_seed: String,
}

impl SimulateRequest {
    /// One config per selected game, carrying the request's overrides.
    pub fn configs(&self) -> ApiResult<Vec<GameConfig>> {
        if self.games.is_empty() {
            return Err(ApiError::Invalid("select at least one game".into()));
        }
        check_bet(self.bet_amount)?;
        // each key runs once, in first-seen order
        let mut seen: Vec<&str> = Vec::with_capacity(self.games.len());
        let mut configs = Vec::with_capacity(self.games.len());
        for key in &self.games {
            let kind = GameKind::from_key(key)
                .ok_or_else(|| ApiError::Invalid(format!("unknown game: {key}")))?;
            if seen.contains(&key.as_str()) {
                continue;
            }
            seen.push(key);
            configs.push(GameConfig::new(self.bet_amount, self.apply_overrides(kind)));
        }
        Ok(configs)
    }

    fn apply_overrides(&self, kind: GameKind) -> GameKind {
        match kind {
            GameKind::Tweaked { sides, .. } => GameKind::Tweaked {
                sides,
                payout_multiplier: self.tweaked_payout,
            },
            GameKind::Weighted { sides, .. } => GameKind::Weighted {
                sides,
                player_number_weight: self.weighted_prob,
            },
            GameKind::ModifiedPayout { sides, .. } => GameKind::ModifiedPayout {
                sides,
                payout_multiplier: self.modified_payout,
            },
            GameKind::NormalDist {
                sides,
                min_multiplier,
                max_multiplier,
                ..
            } => GameKind::NormalDist {
                sides,
                mean_multiplier: self.normal_mean,
                std_multiplier: self.normal_std,
                min_multiplier,
                max_multiplier,
            },
            GameKind::Lucky9 { .. } => GameKind::Lucky9 {
                payout_multiplier: self.lucky9_payout,
            },
            other => other,
        }
    }
}

/// Display row of the comparison table; numbers are pre-formatted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatsRow {
    pub game: String,
    pub win_rate: String,
    pub player_roi: String,
    pub house_roi: String,
    pub final_player_balance: String,
    pub final_house_balance: String,
    pub theoretical_edge: String,
}

impl From<&SuiteEntry> for StatsRow {
    fn from(e: &SuiteEntry) -> Self {
        let s = &e.summary;
        StatsRow {
            game: e.label.clone(),
            win_rate: format!("{:.2}%", s.win_rate * 100.0),
            player_roi: format!("{:.2}%", s.player_roi),
            house_roi: format!("{:.2}%", s.house_roi),
            final_player_balance: format!("{:.2}", s.final_player_balance),
            final_house_balance: format!("{:.2}", s.final_house_balance),
            theoretical_edge: e
                .theoretical_edge
                .map(|v| format!("{v:.2}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Point {
    pub x: usize,
    pub y: f64,
}

/// Cumulative player profit by game number.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<Point>,
}

impl From<&SuiteEntry> for ChartSeries {
    fn from(e: &SuiteEntry) -> Self {
        ChartSeries {
            label: e.label.clone(),
            data: e
                .batch
                .player_curve()
                .into_iter()
                .map(|(x, y)| Point { x, y })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MetricsRow {
    pub label: String,
    pub win_rate: f64,
    pub player_roi: f64,
    pub house_roi: f64,
}

impl From<&SuiteEntry> for MetricsRow {
    fn from(e: &SuiteEntry) -> Self {
        MetricsRow {
            label: e.label.clone(),
            win_rate: round2(e.summary.win_rate * 100.0),
            player_roi: round2(e.summary.player_roi),
            house_roi: round2(e.summary.house_roi),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SimulateResponse {
    pub num_simulations: usize,
    pub bet_amount: f64,
    pub stats_rows: Vec<StatsRow>,
    pub chart_series: Vec<ChartSeries>,
    pub metrics_series: Vec<MetricsRow>,
    pub proof: Proof,
    pub generated_at: DateTime<Utc>,
}

impl SimulateResponse {
    pub fn from_entries(req: &SimulateRequest, entries: &[SuiteEntry], proof: Proof) -> Self {
        SimulateResponse {
            num_simulations: req.num_simulations,
            bet_amount: req.bet_amount,
            stats_rows: entries.iter().map(StatsRow::from).collect(),
            chart_series: entries.iter().map(ChartSeries::from).collect(),
            metrics_series: entries.iter().map(MetricsRow::from).collect(),
            proof,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifyResponse {
    pub server_seed_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("internal server error")]
    Internal,
}

impl From<SimError> for ApiError {
    fn from(e: SimError) -> Self {
        ApiError::Invalid(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
