pub mod color;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod game;
pub mod lucky9;
pub mod outcome;
pub mod paytable;
pub mod rng;
pub mod simulation;
pub mod stats;
pub mod symbols;

pub use crate::color::{ColorDice, ColorMode};
pub use crate::config::{GameConfig, GameKind};
pub use crate::dice::{FairDice, NormalPayoutDice, PayoutDice, WeightedDice};
pub use crate::engine::{compute_spin, settle_spin, spin_once, spin_with_seeds, verify_spin, SlotMachine};
pub use crate::error::{SimError, SimResult};
pub use crate::game::{Game, GameModel};
pub use crate::lucky9::{build_deck, draw_from_deck, hand_total, Deck, Lucky9};
pub use crate::outcome::{Detail, Outcome};
pub use crate::paytable::{MatchPaytable, Paytable, PaytableEntry};
pub use crate::rng::{derive_hash_hex, ProvablyFairRng, RandomSource};
pub use crate::simulation::{run_batch, run_suite, Batch, SuiteEntry, TrialRecord};
pub use crate::stats::{house_edge, summarize, SummaryStatistics};
pub use crate::symbols::{DiceColor, ReelsConfig, Symbol};
