//! Serializable game configurations.
//!
//! A [`GameConfig`] is what callers hand over (JSON from the server, flags
//! from the CLI). Missing fields take the documented defaults; validation
//! happens in [`GameConfig::build`].
//!
//! ```rust
//! use oddslab_core::{Game, GameConfig};
//!
//! let cfg: GameConfig =
//!     serde_json::from_str(r#"{"kind": "tweaked", "payout_multiplier": 4.5}"#).unwrap();
//! assert_eq!(cfg.bet_amount, 1.0);
//! let model = cfg.build().unwrap();
//! assert_eq!(model.name(), "Reduced Payout");
//! ```

use crate::{
    color::{ColorDice, ColorMode, DEFAULT_CHOSEN_PROB},
    dice::{
        FairDice, NormalPayoutDice, PayoutDice, WeightedDice, DEFAULT_PLAYER_WEIGHT,
        DEFAULT_SIDES, MODIFIED_PAYOUT_MULTIPLIER, REDUCED_PAYOUT_MULTIPLIER,
    },
    engine::SlotMachine,
    error::SimResult,
    game::GameModel,
    lucky9::{Lucky9, DEFAULT_PAYOUT_MULTIPLIER},
    symbols::DiceColor,
};
use serde::{Deserialize, Serialize};

fn default_bet() -> f64 {
    1.0
}
fn default_sides() -> u32 {
    DEFAULT_SIDES
}
fn default_reduced() -> f64 {
    REDUCED_PAYOUT_MULTIPLIER
}
fn default_modified() -> f64 {
    MODIFIED_PAYOUT_MULTIPLIER
}
fn default_weight() -> f64 {
    DEFAULT_PLAYER_WEIGHT
}
fn default_mean() -> f64 {
    5.0
}
fn default_std() -> f64 {
    1.5
}
fn default_min() -> f64 {
    0.0
}
fn default_max() -> f64 {
    10.0
}
fn default_lucky9() -> f64 {
    DEFAULT_PAYOUT_MULTIPLIER
}
fn default_color() -> DiceColor {
    DiceColor::Red
}
fn default_chosen_prob() -> f64 {
    DEFAULT_CHOSEN_PROB
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameKind {
    Fair {
        #[serde(default = "default_sides")]
        sides: u32,
    },
    /// Reduced payout dice.
    Tweaked {
        #[serde(default = "default_sides")]
        sides: u32,
        #[serde(default = "default_reduced")]
        payout_multiplier: f64,
    },
    Weighted {
        #[serde(default = "default_sides")]
        sides: u32,
        #[serde(default = "default_weight")]
        player_number_weight: f64,
    },
    ModifiedPayout {
        #[serde(default = "default_sides")]
        sides: u32,
        #[serde(default = "default_modified")]
        payout_multiplier: f64,
    },
    NormalDist {
        #[serde(default = "default_sides")]
        sides: u32,
        #[serde(default = "default_mean")]
        mean_multiplier: f64,
        #[serde(default = "default_std")]
        std_multiplier: f64,
        #[serde(default = "default_min")]
        min_multiplier: f64,
        #[serde(default = "default_max")]
        max_multiplier: f64,
    },
    Lucky9 {
        #[serde(default = "default_lucky9")]
        payout_multiplier: f64,
    },
    SlotMachine,
    ColorDice {
        #[serde(default = "default_color")]
        bet_color: DiceColor,
        #[serde(default)]
        mode: ColorMode,
        #[serde(default = "default_chosen_prob")]
        chosen_prob: f64,
    },
}

impl GameKind {
    pub const KEYS: [&'static str; 8] = [
        "fair",
        "tweaked",
        "weighted",
        "modified_payout",
        "normal_dist",
        "lucky9",
        "slot_machine",
        "color_dice",
    ];

    pub fn key(&self) -> &'static str {
        match self {
            GameKind::Fair { .. } => "fair",
            GameKind::Tweaked { .. } => "tweaked",
            GameKind::Weighted { .. } => "weighted",
            GameKind::ModifiedPayout { .. } => "modified_payout",
            GameKind::NormalDist { .. } => "normal_dist",
            GameKind::Lucky9 { .. } => "lucky9",
            GameKind::SlotMachine => "slot_machine",
            GameKind::ColorDice { .. } => "color_dice",
        }
    }

    /// Default configuration for a key, or `None` for an unknown key.
    pub fn from_key(key: &str) -> Option<Self> {
        let kind = match key {
            "fair" => Self::fair(),
            "tweaked" => GameKind::Tweaked {
                sides: DEFAULT_SIDES,
                payout_multiplier: REDUCED_PAYOUT_MULTIPLIER,
            },
            "weighted" => GameKind::Weighted {
                sides: DEFAULT_SIDES,
                player_number_weight: DEFAULT_PLAYER_WEIGHT,
            },
            "modified_payout" => GameKind::ModifiedPayout {
                sides: DEFAULT_SIDES,
                payout_multiplier: MODIFIED_PAYOUT_MULTIPLIER,
            },
            "normal_dist" => GameKind::NormalDist {
                sides: DEFAULT_SIDES,
                mean_multiplier: default_mean(),
                std_multiplier: default_std(),
                min_multiplier: default_min(),
                max_multiplier: default_max(),
            },
            "lucky9" => Self::lucky9(),
            "slot_machine" => GameKind::SlotMachine,
            "color_dice" => GameKind::ColorDice {
                bet_color: DiceColor::Red,
                mode: ColorMode::Fair,
                chosen_prob: DEFAULT_CHOSEN_PROB,
            },
            _ => return None,
        };
        Some(kind)
    }

    pub fn fair() -> Self {
        GameKind::Fair {
            sides: DEFAULT_SIDES,
        }
    }

    pub fn lucky9() -> Self {
        GameKind::Lucky9 {
            payout_multiplier: DEFAULT_PAYOUT_MULTIPLIER,
        }
    }

    pub fn all_defaults() -> Vec<Self> {
        Self::KEYS.iter().filter_map(|k| Self::from_key(k)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_bet")]
    pub bet_amount: f64,
    #[serde(flatten)]
    pub kind: GameKind,
}

impl GameConfig {
    pub fn new(bet_amount: f64, kind: GameKind) -> Self {
        Self { bet_amount, kind }
    }

    pub fn build(&self) -> SimResult<GameModel> {
        let bet = self.bet_amount;
        let model = match self.kind {
            GameKind::Fair { sides } => GameModel::FairDice(FairDice::new(bet, sides)?),
            GameKind::Tweaked {
                sides,
                payout_multiplier,
            } => GameModel::ReducedPayout(PayoutDice::reduced(bet, sides, payout_multiplier)?),
            GameKind::Weighted {
                sides,
                player_number_weight,
            } => GameModel::WeightedDice(WeightedDice::new(bet, sides, player_number_weight)?),
            GameKind::ModifiedPayout {
                sides,
                payout_multiplier,
            } => {
                GameModel::ModifiedPayout(PayoutDice::modified(bet, sides, payout_multiplier)?)
            }
            GameKind::NormalDist {
                sides,
                mean_multiplier,
                std_multiplier,
                min_multiplier,
                max_multiplier,
            } => GameModel::NormalPayout(NormalPayoutDice::new(
                bet,
                sides,
                mean_multiplier,
                std_multiplier,
                min_multiplier,
                max_multiplier,
            )?),
            GameKind::Lucky9 { payout_multiplier } => {
                GameModel::Lucky9(Lucky9::new(bet, payout_multiplier)?)
            }
            GameKind::SlotMachine => GameModel::Slot(SlotMachine::new(bet)?),
            GameKind::ColorDice {
                bet_color,
                mode,
                chosen_prob,
            } => GameModel::ColorDice(ColorDice::new(bet, bet_color, mode, chosen_prob)?),
        };
        Ok(model)
    }
}
