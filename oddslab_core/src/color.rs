//! Three color dice against one bet color; pays by number of matches.

use crate::{
    dice::clamp_weight,
    error::{check_bet, SimResult},
    game::Game,
    outcome::{Detail, Outcome},
    paytable::MatchPaytable,
    rng::RandomSource,
    stats::edge_from_rtp,
    symbols::DiceColor,
};
use serde::{Deserialize, Serialize};

pub const COLOR_DICE_COUNT: usize = 3;
pub const DEFAULT_CHOSEN_PROB: f64 = 0.18;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Fair,
    /// Bet color weighted, standard payouts.
    Weighted,
    /// Bet color weighted, payouts cut to 90%.
    Tweaked,
}

impl ColorMode {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "weighted" => ColorMode::Weighted,
            "tweaked" => ColorMode::Tweaked,
            _ => ColorMode::Fair,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorDice {
    bet_amount: f64,
    bet_color: DiceColor,
    mode: ColorMode,
    probabilities: [f64; 6],
    paytable: MatchPaytable,
}

impl ColorDice {
    pub fn new(
        bet_amount: f64,
        bet_color: DiceColor,
        mode: ColorMode,
        chosen_prob: f64,
    ) -> SimResult<Self> {
        let bet_amount = check_bet(bet_amount)?;
        let probabilities = match mode {
            ColorMode::Fair => [1.0 / 6.0; 6],
            ColorMode::Weighted | ColorMode::Tweaked => {
                let chosen = clamp_weight("chosen_prob", chosen_prob)?;
                let mut probs = [(1.0 - chosen) / 5.0; 6];
                probs[bet_color.to_index()] = chosen;
                probs
            }
        };
        let paytable = match mode {
            ColorMode::Tweaked => MatchPaytable::tweaked(),
            ColorMode::Fair | ColorMode::Weighted => MatchPaytable::standard(),
        };
        Ok(Self {
            bet_amount,
            bet_color,
            mode,
            probabilities,
            paytable,
        })
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn probabilities(&self) -> &[f64; 6] {
        &self.probabilities
    }

    /// Probability the bet color shows on any single die.
    fn hit_probability(&self) -> f64 {
        self.probabilities[self.bet_color.to_index()]
    }

    /// Expected multiplier over the binomial match count.
    pub fn theoretical_rtp(&self) -> f64 {
        let p = self.hit_probability();
        let binom = [1.0, 3.0, 3.0, 1.0];
        (0..=COLOR_DICE_COUNT)
            .map(|k| {
                binom[k]
                    * p.powi(k as i32)
                    * (1.0 - p).powi((COLOR_DICE_COUNT - k) as i32)
                    * self.paytable.multiplier(k)
            })
            .sum()
    }
}

impl Game for ColorDice {
    fn name(&self) -> &'static str {
        "Color Dice"
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        let dice: Vec<DiceColor> = (0..COLOR_DICE_COUNT)
            .map(|_| DiceColor::ALL[rng.weighted_index(&self.probabilities)])
            .collect();
        let matches = dice.iter().filter(|c| **c == self.bet_color).count();
        let payout = self.bet_amount * self.paytable.multiplier(matches);
        Outcome::settle(
            self.bet_amount,
            payout > self.bet_amount,
            payout,
            Detail::ColorDice {
                bet_color: self.bet_color,
                dice,
                matches,
                probabilities: self.probabilities.to_vec(),
            },
        )
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        Some(edge_from_rtp(self.theoretical_rtp()))
    }
}
