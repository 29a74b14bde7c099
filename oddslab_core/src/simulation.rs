//! Batch trial runner.
//!
//! A batch is `count` sequential trials of one game configuration. Each
//! record carries its 1-based `game_number` and the running profit totals
//! up to and including that trial, so the cumulative curve can be plotted
//! straight from the records.

use crate::{
    config::GameConfig,
    error::{SimError, SimResult},
    game::{Game, GameModel},
    outcome::Outcome,
    rng::{ProvablyFairRng, RandomSource},
    stats::{summarize, SummaryStatistics},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub game_number: usize,
    pub outcome: Outcome,
    pub cumulative_player_profit: f64,
    pub cumulative_house_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub label: String,
    pub records: Vec<TrialRecord>,
}

impl Batch {
    /// Number outcomes in order and accumulate both profit columns.
    pub fn from_outcomes(label: impl Into<String>, outcomes: Vec<Outcome>) -> Self {
        let mut player = 0.0;
        let mut house = 0.0;
        let records = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| {
                player += outcome.player_profit;
                house += outcome.house_profit;
                TrialRecord {
                    game_number: i + 1,
                    outcome,
                    cumulative_player_profit: player,
                    cumulative_house_profit: house,
                }
            })
            .collect();
        Self {
            label: label.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(game_number, cumulative_player_profit)` points.
    pub fn player_curve(&self) -> Vec<(usize, f64)> {
        self.records
            .iter()
            .map(|r| (r.game_number, r.cumulative_player_profit))
            .collect()
    }
}

pub fn run_batch<G, R>(game: &G, count: usize, rng: &mut R) -> SimResult<Batch>
where
    G: Game,
    R: RandomSource + ?Sized,
{
    if count == 0 {
        return Err(SimError::invalid("count", "a batch needs at least one trial"));
    }
    debug!(game = game.name(), count, "running batch");
    let outcomes: Vec<Outcome> = (0..count).map(|_| game.play(rng)).collect();
    let batch = Batch::from_outcomes(game.name(), outcomes);
    if let Some(last) = batch.records.last() {
        debug!(
            game = game.name(),
            final_player_balance = last.cumulative_player_profit,
            "batch finished"
        );
    }
    Ok(batch)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteEntry {
    pub key: String,
    pub label: String,
    pub batch: Batch,
    pub summary: SummaryStatistics,
    pub theoretical_edge: Option<f64>,
}

/// Run one batch per configuration, in parallel, and summarize each.
///
/// Batch `i` draws from `rng.fork(i)`, so results do not depend on how the
/// batches are scheduled. Every configuration is validated before any
/// batch starts.
pub fn run_suite(
    configs: &[GameConfig],
    count: usize,
    rng: &ProvablyFairRng,
) -> SimResult<Vec<SuiteEntry>> {
    if count == 0 {
        return Err(SimError::invalid("count", "a batch needs at least one trial"));
    }
    let models = configs
        .iter()
        .map(|c| c.build().map(|m| (c.kind.key(), m)))
        .collect::<SimResult<Vec<(&'static str, GameModel)>>>()?;
    debug!(batches = models.len(), count, "dispatching suite");

    models
        .par_iter()
        .enumerate()
        .map(|(i, (key, model))| -> SimResult<SuiteEntry> {
            let mut stream = rng.fork(i as u64);
            let batch = run_batch(model, count, &mut stream)?;
            let summary = summarize(&batch)?;
            Ok(SuiteEntry {
                key: key.to_string(),
                label: model.name().to_string(),
                batch,
                summary,
                theoretical_edge: model.theoretical_house_edge(),
            })
        })
        .collect()
}
