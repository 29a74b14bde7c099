//! Single-die games: the player names a face, one die is rolled.

use crate::{
    error::{check_bet, check_multiplier, SimError, SimResult, MAX_MULTIPLIER},
    game::Game,
    outcome::{Detail, Outcome},
    rng::RandomSource,
    stats::house_edge,
};

pub const DEFAULT_SIDES: u32 = 6;
pub const MAX_SIDES: u32 = 1000;
pub const REDUCED_PAYOUT_MULTIPLIER: f64 = 5.0;
pub const MODIFIED_PAYOUT_MULTIPLIER: f64 = 5.7;
pub const DEFAULT_PLAYER_WEIGHT: f64 = 0.12;
pub const WEIGHT_FLOOR: f64 = 0.05;
pub const WEIGHT_CEILING: f64 = 0.30;

pub(crate) fn check_sides(sides: u32) -> SimResult<u32> {
    if !(2..=MAX_SIDES).contains(&sides) {
        return Err(SimError::invalid(
            "sides",
            format!("a die needs 2 to {MAX_SIDES} sides, got {sides}"),
        ));
    }
    Ok(sides)
}

/// Clamp a requested win weight into `[WEIGHT_FLOOR, WEIGHT_CEILING]`.
pub fn clamp_weight(field: &'static str, weight: f64) -> SimResult<f64> {
    if weight.is_nan() {
        return Err(SimError::invalid(field, "weight is not a number"));
    }
    Ok(weight.clamp(WEIGHT_FLOOR, WEIGHT_CEILING))
}

fn settle_fixed(bet: f64, multiplier: f64, player_choice: u32, dice_roll: u32) -> Outcome {
    let player_won = dice_roll == player_choice;
    let payout = if player_won { bet * multiplier } else { 0.0 };
    Outcome::settle(
        bet,
        player_won,
        payout,
        Detail::Dice {
            player_choice,
            dice_roll,
        },
    )
}

/// Break-even game: a win pays `sides` times the bet.
#[derive(Debug, Clone, PartialEq)]
pub struct FairDice {
    sides: u32,
    bet_amount: f64,
}

impl FairDice {
    pub fn new(bet_amount: f64, sides: u32) -> SimResult<Self> {
        Ok(Self {
            sides: check_sides(sides)?,
            bet_amount: check_bet(bet_amount)?,
        })
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn payout_multiplier(&self) -> f64 {
        self.sides as f64
    }
}

impl Game for FairDice {
    fn name(&self) -> &'static str {
        "Fair Game"
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        let player_choice = rng.roll(self.sides);
        let dice_roll = rng.roll(self.sides);
        settle_fixed(self.bet_amount, self.payout_multiplier(), player_choice, dice_roll)
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        Some(house_edge(1.0 / self.sides as f64, self.payout_multiplier()))
    }
}

/// Fair odds with a configurable win multiplier. Backs both the reduced
/// payout (5.0) and modified payout (5.7) configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutDice {
    label: &'static str,
    sides: u32,
    bet_amount: f64,
    payout_multiplier: f64,
}

impl PayoutDice {
    pub fn new(
        label: &'static str,
        bet_amount: f64,
        sides: u32,
        payout_multiplier: f64,
    ) -> SimResult<Self> {
        Ok(Self {
            label,
            sides: check_sides(sides)?,
            bet_amount: check_bet(bet_amount)?,
            payout_multiplier: check_multiplier("payout_multiplier", payout_multiplier)?,
        })
    }

    pub fn reduced(bet_amount: f64, sides: u32, payout_multiplier: f64) -> SimResult<Self> {
        Self::new("Reduced Payout", bet_amount, sides, payout_multiplier)
    }

    pub fn modified(bet_amount: f64, sides: u32, payout_multiplier: f64) -> SimResult<Self> {
        Self::new("Modified Payout", bet_amount, sides, payout_multiplier)
    }

    pub fn payout_multiplier(&self) -> f64 {
        self.payout_multiplier
    }
}

impl Game for PayoutDice {
    fn name(&self) -> &'static str {
        self.label
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        let player_choice = rng.roll(self.sides);
        let dice_roll = rng.roll(self.sides);
        settle_fixed(self.bet_amount, self.payout_multiplier, player_choice, dice_roll)
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        Some(house_edge(1.0 / self.sides as f64, self.payout_multiplier))
    }
}

/// Fair payout, skewed die: the player's face comes up with probability
/// `player_weight`, the other faces split the rest evenly.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedDice {
    sides: u32,
    bet_amount: f64,
    player_weight: f64,
}

impl WeightedDice {
    pub fn new(bet_amount: f64, sides: u32, player_weight: f64) -> SimResult<Self> {
        Ok(Self {
            sides: check_sides(sides)?,
            bet_amount: check_bet(bet_amount)?,
            player_weight: clamp_weight("player_number_weight", player_weight)?,
        })
    }

    pub fn player_weight(&self) -> f64 {
        self.player_weight
    }

    /// Probability of each face other than the player's.
    pub fn other_face_weight(&self) -> f64 {
        (1.0 - self.player_weight) / (self.sides - 1) as f64
    }

    /// Roll the skewed die for a player on `player_choice` (1-based).
    fn roll_against<R: RandomSource + ?Sized>(&self, rng: &mut R, player_choice: u32) -> u32 {
        if rng.unit() < self.player_weight {
            return player_choice;
        }
        // uniform over the other sides - 1 faces, skipping the player's
        let face = rng.roll(self.sides - 1);
        if face >= player_choice {
            face + 1
        } else {
            face
        }
    }
}

impl Game for WeightedDice {
    fn name(&self) -> &'static str {
        "Weighted Probabilities"
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        let player_choice = rng.roll(self.sides);
        let dice_roll = self.roll_against(rng, player_choice);
        settle_fixed(self.bet_amount, self.sides as f64, player_choice, dice_roll)
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        Some(house_edge(self.player_weight, self.sides as f64))
    }
}

/// Fair odds; a winning multiplier is drawn from N(mean, std) and clamped
/// into `[min_multiplier, max_multiplier]`, never below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalPayoutDice {
    sides: u32,
    bet_amount: f64,
    mean_multiplier: f64,
    std_multiplier: f64,
    min_multiplier: f64,
    max_multiplier: f64,
}

impl NormalPayoutDice {
    pub fn new(
        bet_amount: f64,
        sides: u32,
        mean_multiplier: f64,
        std_multiplier: f64,
        min_multiplier: f64,
        max_multiplier: f64,
    ) -> SimResult<Self> {
        if !mean_multiplier.is_finite() {
            return Err(SimError::invalid("mean_multiplier", "must be finite"));
        }
        let std_multiplier = check_multiplier("std_multiplier", std_multiplier)?;
        if !min_multiplier.is_finite() || !max_multiplier.is_finite() {
            return Err(SimError::invalid("min_multiplier", "bounds must be finite"));
        }
        if max_multiplier > MAX_MULTIPLIER {
            return Err(SimError::invalid(
                "max_multiplier",
                format!("must be at most {MAX_MULTIPLIER}, got {max_multiplier}"),
            ));
        }
        if min_multiplier > max_multiplier {
            return Err(SimError::invalid(
                "min_multiplier",
                format!("{min_multiplier} exceeds max_multiplier {max_multiplier}"),
            ));
        }
        Ok(Self {
            sides: check_sides(sides)?,
            bet_amount: check_bet(bet_amount)?,
            mean_multiplier,
            std_multiplier,
            min_multiplier,
            max_multiplier,
        })
    }

    fn bounded(&self, sampled: f64) -> f64 {
        sampled
            .clamp(self.min_multiplier, self.max_multiplier)
            .max(0.0)
    }
}

impl Game for NormalPayoutDice {
    fn name(&self) -> &'static str {
        "Normal Distribution"
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        let player_choice = rng.roll(self.sides);
        let dice_roll = rng.roll(self.sides);
        let player_won = dice_roll == player_choice;
        let multiplier = if player_won {
            self.bounded(rng.normal(self.mean_multiplier, self.std_multiplier))
        } else {
            0.0
        };
        Outcome::settle(
            self.bet_amount,
            player_won,
            self.bet_amount * multiplier,
            Detail::SampledDice {
                player_choice,
                dice_roll,
                multiplier,
            },
        )
    }
}
