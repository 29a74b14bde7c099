//! The per-trial record every game model produces.

use crate::symbols::{DiceColor, Symbol};
use serde::{Deserialize, Serialize};

/// Game-specific part of an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Detail {
    Dice {
        player_choice: u32,
        dice_roll: u32,
    },
    /// Dice round whose winning multiplier was sampled.
    SampledDice {
        player_choice: u32,
        dice_roll: u32,
        multiplier: f64,
    },
    Cards {
        player_cards: Vec<u8>,
        dealer_cards: Vec<u8>,
        player_total: u8,
        dealer_total: u8,
        tie: bool,
    },
    Slot {
        spin: Vec<Symbol>,
        multiplier: f64,
    },
    ColorDice {
        bet_color: DiceColor,
        dice: Vec<DiceColor>,
        matches: usize,
        probabilities: Vec<f64>,
    },
}

/// Result of one trial. Built only through [`Outcome::settle`], which
/// derives both profit columns from bet and payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub player_bet: f64,
    pub player_won: bool,
    pub payout: f64,
    pub player_profit: f64,
    pub house_profit: f64,
    pub detail: Detail,
}

impl Outcome {
    pub fn settle(player_bet: f64, player_won: bool, payout: f64, detail: Detail) -> Self {
        let payout = payout.max(0.0);
        Self {
            player_bet,
            player_won,
            payout,
            player_profit: payout - player_bet,
            house_profit: player_bet - payout,
            detail,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self.detail, Detail::Cards { tie: true, .. })
    }

    pub fn multiplier(&self) -> f64 {
        self.payout / self.player_bet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profits_mirror_each_other() {
        let o = Outcome::settle(
            2.0,
            true,
            12.0,
            Detail::Dice {
                player_choice: 3,
                dice_roll: 3,
            },
        );
        assert_eq!(o.player_profit, 10.0);
        assert_eq!(o.house_profit, -10.0);
        assert_eq!(o.player_profit + o.house_profit, 0.0);
        assert_eq!(o.multiplier(), 6.0);
    }

    #[test]
    fn negative_payout_is_floored() {
        let o = Outcome::settle(
            1.0,
            false,
            -0.5,
            Detail::SampledDice {
                player_choice: 1,
                dice_roll: 2,
                multiplier: 0.0,
            },
        );
        assert_eq!(o.payout, 0.0);
        assert_eq!(o.player_profit, -1.0);
    }

    #[test]
    fn detail_is_tagged_in_json() {
        let o = Outcome::settle(
            1.0,
            true,
            25.0,
            Detail::Slot {
                spin: vec![Symbol::Bar; 3],
                multiplier: 25.0,
            },
        );
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["detail"]["type"], "slot");
        assert_eq!(v["detail"]["spin"][0], "BAR");
    }
}
