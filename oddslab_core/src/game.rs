use crate::{
    color::ColorDice,
    dice::{FairDice, NormalPayoutDice, PayoutDice, WeightedDice},
    engine::SlotMachine,
    lucky9::Lucky9,
    outcome::Outcome,
    rng::RandomSource,
};

/// A game model: its configuration is fixed at construction and every call
/// to [`Game::play`] is one independent trial.
pub trait Game {
    /// Display label used in comparison tables.
    fn name(&self) -> &'static str;

    fn bet_amount(&self) -> f64;

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome;

    /// Expected house edge in percent, where it has a closed form.
    fn theoretical_house_edge(&self) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone)]
pub enum GameModel {
    FairDice(FairDice),
    ReducedPayout(PayoutDice),
    WeightedDice(WeightedDice),
    ModifiedPayout(PayoutDice),
    NormalPayout(NormalPayoutDice),
    Lucky9(Lucky9),
    Slot(SlotMachine),
    ColorDice(ColorDice),
}

impl Game for GameModel {
    fn name(&self) -> &'static str {
        match self {
            GameModel::FairDice(g) => g.name(),
            GameModel::ReducedPayout(g) | GameModel::ModifiedPayout(g) => g.name(),
            GameModel::WeightedDice(g) => g.name(),
            GameModel::NormalPayout(g) => g.name(),
            GameModel::Lucky9(g) => g.name(),
            GameModel::Slot(g) => g.name(),
            GameModel::ColorDice(g) => g.name(),
        }
    }

    fn bet_amount(&self) -> f64 {
        match self {
            GameModel::FairDice(g) => g.bet_amount(),
            GameModel::ReducedPayout(g) | GameModel::ModifiedPayout(g) => g.bet_amount(),
            GameModel::WeightedDice(g) => g.bet_amount(),
            GameModel::NormalPayout(g) => g.bet_amount(),
            GameModel::Lucky9(g) => g.bet_amount(),
            GameModel::Slot(g) => g.bet_amount(),
            GameModel::ColorDice(g) => g.bet_amount(),
        }
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        match self {
            GameModel::FairDice(g) => g.play(rng),
            GameModel::ReducedPayout(g) | GameModel::ModifiedPayout(g) => g.play(rng),
            GameModel::WeightedDice(g) => g.play(rng),
            GameModel::NormalPayout(g) => g.play(rng),
            GameModel::Lucky9(g) => g.play(rng),
            GameModel::Slot(g) => g.play(rng),
            GameModel::ColorDice(g) => g.play(rng),
        }
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        match self {
            GameModel::FairDice(g) => g.theoretical_house_edge(),
            GameModel::ReducedPayout(g) | GameModel::ModifiedPayout(g) => {
                g.theoretical_house_edge()
            }
            GameModel::WeightedDice(g) => g.theoretical_house_edge(),
            GameModel::NormalPayout(g) => g.theoretical_house_edge(),
            GameModel::Lucky9(g) => g.theoretical_house_edge(),
            GameModel::Slot(g) => g.theoretical_house_edge(),
            GameModel::ColorDice(g) => g.theoretical_house_edge(),
        }
    }
}
