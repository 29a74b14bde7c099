//! Batch reduction: summary metrics over one [`Batch`], plus the closed-form
//! house edge used as a theoretical check next to simulated results.

use crate::{
    error::{SimError, SimResult},
    simulation::Batch,
};
use serde::{Deserialize, Serialize};

/// Closed-form house edge in percent: `(1 - p * m) * 100`.
///
/// ```rust
/// use oddslab_core::house_edge;
///
/// assert!(house_edge(1.0 / 6.0, 6.0).abs() < 1e-12);
/// assert!((house_edge(1.0 / 6.0, 5.0) - 16.67).abs() < 0.01);
/// ```
pub fn house_edge(win_probability: f64, payout_multiplier: f64) -> f64 {
    (1.0 - win_probability * payout_multiplier) * 100.0
}

/// Edge implied by an expected return per unit wagered.
pub fn edge_from_rtp(rtp: f64) -> f64 {
    house_edge(1.0, rtp)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_games: usize,
    pub total_bet: f64,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_player_profit: f64,
    pub total_house_profit: f64,
    pub avg_player_profit_per_game: f64,
    pub avg_house_profit_per_game: f64,
    /// Sample standard deviation (n - 1) of per-trial profit.
    pub std_player_profit: f64,
    pub std_house_profit: f64,
    pub final_player_balance: f64,
    pub final_house_balance: f64,
    pub max_player_profit: f64,
    pub min_player_profit: f64,
    pub max_house_profit: f64,
    pub min_house_profit: f64,
    pub player_max_drawdown: f64,
    pub house_max_drawdown: f64,
    pub player_roi: f64,
    pub house_roi: f64,
}

/// Sample standard deviation; a single value has no spread.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Largest fall from a running peak of a cumulative curve. The peak starts
/// at zero, the balance before the first trial.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = 0.0f64;
    let mut max_dd = 0.0f64;
    for &value in curve {
        peak = peak.max(value);
        max_dd = max_dd.max(peak - value);
    }
    max_dd
}

fn extrema(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

pub fn summarize(batch: &Batch) -> SimResult<SummaryStatistics> {
    let last = batch.records.last().ok_or(SimError::EmptyBatch)?;
    let total_games = batch.records.len();
    let n = total_games as f64;

    let mut total_bet = 0.0;
    let mut wins = 0usize;
    let mut player_profits = Vec::with_capacity(total_games);
    let mut house_profits = Vec::with_capacity(total_games);
    let mut player_curve = Vec::with_capacity(total_games);
    let mut house_curve = Vec::with_capacity(total_games);
    for record in &batch.records {
        total_bet += record.outcome.player_bet;
        if record.outcome.player_won {
            wins += 1;
        }
        player_profits.push(record.outcome.player_profit);
        house_profits.push(record.outcome.house_profit);
        player_curve.push(record.cumulative_player_profit);
        house_curve.push(record.cumulative_house_profit);
    }

    let total_player_profit: f64 = player_profits.iter().sum();
    let total_house_profit: f64 = house_profits.iter().sum();
    let (min_player_profit, max_player_profit) = extrema(&player_curve);
    let (min_house_profit, max_house_profit) = extrema(&house_curve);

    Ok(SummaryStatistics {
        total_games,
        total_bet,
        wins,
        losses: total_games - wins,
        win_rate: wins as f64 / n,
        total_player_profit,
        total_house_profit,
        avg_player_profit_per_game: total_player_profit / n,
        avg_house_profit_per_game: total_house_profit / n,
        std_player_profit: sample_std(&player_profits),
        std_house_profit: sample_std(&house_profits),
        final_player_balance: last.cumulative_player_profit,
        final_house_balance: last.cumulative_house_profit,
        max_player_profit,
        min_player_profit,
        max_house_profit,
        min_house_profit,
        player_max_drawdown: max_drawdown(&player_curve),
        house_max_drawdown: max_drawdown(&house_curve),
        player_roi: total_player_profit / total_bet * 100.0,
        house_roi: total_house_profit / total_bet * 100.0,
    })
}
