use serde::{Deserialize, Serialize};
use std::fmt;

/// Reel alphabet, ordered from most to least common.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    A,
    B,
    C,
    D,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "BAR")]
    Bar,
}

impl Symbol {
    pub const ALL: [Symbol; 6] = [
        Symbol::A,
        Symbol::B,
        Symbol::C,
        Symbol::D,
        Symbol::Seven,
        Symbol::Bar,
    ];

    pub fn from_index(i: u8) -> Self {
        Self::ALL[(i % 6) as usize]
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::A => 0,
            Symbol::B => 1,
            Symbol::C => 2,
            Symbol::D => 3,
            Symbol::Seven => 4,
            Symbol::Bar => 5,
        }
    }

    /// Appearance rate before normalization.
    pub fn weight(self) -> f64 {
        match self {
            Symbol::A => 0.30,
            Symbol::B => 0.24,
            Symbol::C => 0.18,
            Symbol::D => 0.12,
            Symbol::Seven => 0.10,
            Symbol::Bar => 0.06,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Symbol::A => "A",
            Symbol::B => "B",
            Symbol::C => "C",
            Symbol::D => "D",
            Symbol::Seven => "7",
            Symbol::Bar => "BAR",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelsConfig {
    pub reels: usize,        // independent reels per spin
    pub weights: Vec<f64>,   // normalized, indexed by Symbol::to_index
    pub force_win_chance: f64,
}

impl ReelsConfig {
    pub fn default_3_reel() -> Self {
        let raw: Vec<f64> = Symbol::ALL.iter().map(|s| s.weight()).collect();
        let total: f64 = raw.iter().sum();
        Self {
            reels: 3,
            weights: raw.iter().map(|w| w / total).collect(),
            force_win_chance: 0.08,
        }
    }
}

/// Die faces of the color dice game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiceColor {
    Red,
    Blue,
    Green,
    Yellow,
    Pink,
    White,
}

impl DiceColor {
    pub const ALL: [DiceColor; 6] = [
        DiceColor::Red,
        DiceColor::Blue,
        DiceColor::Green,
        DiceColor::Yellow,
        DiceColor::Pink,
        DiceColor::White,
    ];

    pub fn to_index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Some(DiceColor::Red),
            "blue" => Some(DiceColor::Blue),
            "green" => Some(DiceColor::Green),
            "yellow" => Some(DiceColor::Yellow),
            "pink" => Some(DiceColor::Pink),
            "white" => Some(DiceColor::White),
            _ => None,
        }
    }
}
