use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaytableEntry {
    pub symbol: u8, // Symbol index
    pub count: u8,
    pub payout_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paytable(pub Vec<PaytableEntry>);

impl Paytable {
    /// Triples only; rarer symbols pay more.
    pub fn triples_default() -> Self {
        let table = [
            (Symbol::A, 2.0),
            (Symbol::B, 3.0),
            (Symbol::C, 5.0),
            (Symbol::D, 8.0),
            (Symbol::Seven, 15.0),
            (Symbol::Bar, 25.0),
        ];
        Self(
            table
                .into_iter()
                .map(|(symbol, payout_multiplier)| PaytableEntry {
                    symbol: symbol.to_index(),
                    count: 3,
                    payout_multiplier,
                })
                .collect(),
        )
    }

    pub fn multiplier(&self, symbol: Symbol, count: u8) -> Option<f64> {
        self.0
            .iter()
            .find(|e| e.symbol == symbol.to_index() && e.count == count)
            .map(|e| e.payout_multiplier)
    }
}

/// Color dice multipliers indexed by how many of the three dice match the bet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchPaytable(pub [f64; 4]);

impl MatchPaytable {
    pub fn standard() -> Self {
        Self([0.0, 1.0, 2.0, 3.0])
    }

    pub fn tweaked() -> Self {
        Self([0.0, 0.9, 1.8, 2.7])
    }

    pub fn multiplier(&self, matches: usize) -> f64 {
        self.0.get(matches).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_table_covers_every_symbol() {
        let table = Paytable::triples_default();
        for s in Symbol::ALL {
            assert!(table.multiplier(s, 3).is_some());
            assert_eq!(table.multiplier(s, 2), None);
        }
        assert_eq!(table.multiplier(Symbol::A, 3), Some(2.0));
        assert_eq!(table.multiplier(Symbol::Bar, 3), Some(25.0));
    }

    #[test]
    fn match_tables() {
        assert_eq!(MatchPaytable::standard().multiplier(3), 3.0);
        assert_eq!(MatchPaytable::tweaked().multiplier(1), 0.9);
        assert_eq!(MatchPaytable::tweaked().multiplier(7), 0.0);
    }
}
