//! Lucky 9: two-card hands, totals taken mod 10, higher total wins.
//!
//! Besides [`Game::play`], the staged operations are exposed so a caller can
//! run a round across several requests. None of them keep state: the deck and
//! hands travel with the caller between stages.
//!
//! ```rust
//! use oddslab_core::lucky9::{draw_from_deck, hand_total, Lucky9};
//! use oddslab_core::ProvablyFairRng;
//!
//! let mut rng = ProvablyFairRng::new("server", "client", 1);
//! let game = Lucky9::new(10.0, 2.0).unwrap();
//! let (player, deck) = Lucky9::peek(&mut rng);
//! assert_eq!(player.len(), 2);
//! let (dealer, _deck) = draw_from_deck(&deck, 2).unwrap();
//! let outcome = game.resolve(&player, &dealer).unwrap();
//! assert!(hand_total(&player) < 10);
//! assert!(outcome.payout >= 0.0);
//! ```

use crate::{
    error::{check_bet, check_multiplier, SimError, SimResult},
    game::Game,
    outcome::{Detail, Outcome},
    rng::RandomSource,
    stats::edge_from_rtp,
};
use serde::{Deserialize, Serialize};

pub const DECK_SIZE: usize = 52;
pub const HAND_SIZE: usize = 2;
pub const DEFAULT_PAYOUT_MULTIPLIER: f64 = 2.0;

/// Count of each card value 0..=9 in a fresh deck; tens and faces score 0.
const COMPOSITION: [u32; 10] = [16, 4, 4, 4, 4, 4, 4, 4, 4, 4];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck(pub Vec<u8>);

impl Deck {
    /// Unshuffled base composition: 1..=9 four times, then sixteen zeros.
    pub fn base() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for _ in 0..4 {
            cards.extend(1..=9u8);
        }
        cards.extend([0u8; 16]);
        Deck(cards)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cards(&self) -> &[u8] {
        &self.0
    }
}

pub fn build_deck<R: RandomSource + ?Sized>(rng: &mut R) -> Deck {
    let mut deck = Deck::base();
    rng.permute(&mut deck.0);
    deck
}

/// Split the first `count` cards off `deck`.
pub fn draw_from_deck(deck: &Deck, count: usize) -> SimResult<(Vec<u8>, Deck)> {
    if count > deck.len() {
        return Err(SimError::InsufficientCards {
            needed: count,
            available: deck.len(),
        });
    }
    let (drawn, rest) = deck.0.split_at(count);
    Ok((drawn.to_vec(), Deck(rest.to_vec())))
}

pub fn hand_total(cards: &[u8]) -> u8 {
    (cards.iter().map(|c| *c as u32).sum::<u32>() % 10) as u8
}

fn check_hand(cards: &[u8]) -> SimResult<()> {
    if cards.len() < HAND_SIZE {
        return Err(SimError::InsufficientCards {
            needed: HAND_SIZE,
            available: cards.len(),
        });
    }
    if let Some(bad) = cards.iter().find(|c| **c > 9) {
        return Err(SimError::invalid(
            "cards",
            format!("card values run 0..=9, got {bad}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lucky9 {
    bet_amount: f64,
    payout_multiplier: f64,
}

impl Lucky9 {
    pub fn new(bet_amount: f64, payout_multiplier: f64) -> SimResult<Self> {
        Ok(Self {
            bet_amount: check_bet(bet_amount)?,
            payout_multiplier: check_multiplier("payout_multiplier", payout_multiplier)?,
        })
    }

    pub fn payout_multiplier(&self) -> f64 {
        self.payout_multiplier
    }

    /// Settle two complete hands. Ties push.
    pub fn resolve(&self, player_cards: &[u8], dealer_cards: &[u8]) -> SimResult<Outcome> {
        check_hand(player_cards)?;
        check_hand(dealer_cards)?;
        Ok(self.settle(player_cards, dealer_cards))
    }

    fn settle(&self, player_cards: &[u8], dealer_cards: &[u8]) -> Outcome {
        let player_total = hand_total(player_cards);
        let dealer_total = hand_total(dealer_cards);
        let player_won = player_total > dealer_total;
        let tie = player_total == dealer_total;
        let payout = if tie {
            self.bet_amount
        } else if player_won {
            self.bet_amount * self.payout_multiplier
        } else {
            0.0
        };
        Outcome::settle(
            self.bet_amount,
            player_won,
            payout,
            Detail::Cards {
                player_cards: player_cards.to_vec(),
                dealer_cards: dealer_cards.to_vec(),
                player_total,
                dealer_total,
                tie,
            },
        )
    }

    /// First stage: fresh deck, player's two cards dealt.
    pub fn peek<R: RandomSource + ?Sized>(rng: &mut R) -> (Vec<u8>, Deck) {
        let deck = build_deck(rng);
        let (drawn, rest) = deck.0.split_at(HAND_SIZE);
        (drawn.to_vec(), Deck(rest.to_vec()))
    }

    /// Optional stage: player takes one more card. Returns the new hand, the
    /// drawn card and the remaining deck.
    pub fn hit(player_cards: &[u8], deck: &Deck) -> SimResult<(Vec<u8>, u8, Deck)> {
        let (drawn, rest) = draw_from_deck(deck, 1)?;
        let card = drawn[0];
        let mut hand = player_cards.to_vec();
        hand.push(card);
        Ok((hand, card, rest))
    }

    /// Last stage: if the dealer hand is incomplete, deal it two fresh cards
    /// from `deck`, then resolve.
    pub fn finish(
        &self,
        player_cards: &[u8],
        dealer_cards: &[u8],
        deck: &Deck,
    ) -> SimResult<(Outcome, Deck)> {
        check_hand(player_cards)?;
        if dealer_cards.len() >= HAND_SIZE {
            return Ok((self.resolve(player_cards, dealer_cards)?, deck.clone()));
        }
        let (dealer, rest) = draw_from_deck(deck, HAND_SIZE)?;
        Ok((self.resolve(player_cards, &dealer)?, rest))
    }

    /// Exact win and tie probabilities of a two-versus-two deal from a fresh
    /// deck, enumerated over card values.
    pub fn exact_odds() -> (f64, f64) {
        let mut counts = COMPOSITION;
        let mut win = 0.0;
        let mut tie = 0.0;
        let total = (DECK_SIZE * (DECK_SIZE - 1) * (DECK_SIZE - 2) * (DECK_SIZE - 3)) as f64;
        for a in 0..10 {
            let wa = counts[a] as f64;
            counts[a] -= 1;
            for b in 0..10 {
                if counts[b] == 0 {
                    continue;
                }
                let wb = counts[b] as f64;
                counts[b] -= 1;
                for c in 0..10 {
                    if counts[c] == 0 {
                        continue;
                    }
                    let wc = counts[c] as f64;
                    counts[c] -= 1;
                    for d in 0..10 {
                        let wd = counts[d] as f64;
                        if wd == 0.0 {
                            continue;
                        }
                        let weight = wa * wb * wc * wd;
                        let player = (a + b) % 10;
                        let dealer = (c + d) % 10;
                        if player > dealer {
                            win += weight;
                        } else if player == dealer {
                            tie += weight;
                        }
                    }
                    counts[c] += 1;
                }
                counts[b] += 1;
            }
            counts[a] += 1;
        }
        (win / total, tie / total)
    }
}

impl Game for Lucky9 {
    fn name(&self) -> &'static str {
        "Lucky 9"
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        let deck = build_deck(rng);
        let cards = deck.cards();
        self.settle(&cards[..HAND_SIZE], &cards[HAND_SIZE..HAND_SIZE * 2])
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        let (win, tie) = Self::exact_odds();
        Some(edge_from_rtp(win * self.payout_multiplier + tie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ProvablyFairRng;

    fn game() -> Lucky9 {
        Lucky9::new(10.0, DEFAULT_PAYOUT_MULTIPLIER).unwrap()
    }

    #[test]
    fn base_deck_composition() {
        let deck = Deck::base();
        assert_eq!(deck.len(), DECK_SIZE);
        for (value, expected) in COMPOSITION.iter().enumerate() {
            let n = deck.cards().iter().filter(|c| **c as usize == value).count();
            assert_eq!(n as u32, *expected);
        }
    }

    #[test]
    fn built_deck_is_a_permutation() {
        let mut rng = ProvablyFairRng::new("l9", "client", 1);
        let deck = build_deck(&mut rng);
        assert_ne!(deck, Deck::base());
        let mut sorted = deck.0.clone();
        sorted.sort();
        let mut base = Deck::base().0;
        base.sort();
        assert_eq!(sorted, base);
    }

    #[test]
    fn draw_splits_prefix() {
        let deck = Deck(vec![3, 1, 4, 1, 5]);
        let (drawn, rest) = draw_from_deck(&deck, 2).unwrap();
        assert_eq!(drawn, vec![3, 1]);
        assert_eq!(rest, Deck(vec![4, 1, 5]));
        let (drawn, rest) = draw_from_deck(&rest, 3).unwrap();
        assert_eq!(drawn, vec![4, 1, 5]);
        assert!(rest.is_empty());
        assert_eq!(
            draw_from_deck(&rest, 1),
            Err(SimError::InsufficientCards {
                needed: 1,
                available: 0
            })
        );
    }

    #[test]
    fn totals_wrap_at_ten() {
        assert_eq!(hand_total(&[5, 7]), 2);
        assert_eq!(hand_total(&[4, 5]), 9);
        assert_eq!(hand_total(&[0, 0]), 0);
        assert_eq!(hand_total(&[9, 9, 9]), 7);
    }

    #[test]
    fn player_win_pays_multiplier() {
        let out = game().resolve(&[5, 7], &[3, 8]).unwrap();
        assert!(out.player_won);
        assert!(!out.is_tie());
        assert_eq!(out.payout, 20.0);
        assert_eq!(out.player_profit, 10.0);
    }

    #[test]
    fn tie_pushes() {
        let out = game().resolve(&[4, 5], &[0, 9]).unwrap();
        assert!(out.is_tie());
        assert!(!out.player_won);
        assert_eq!(out.payout, 10.0);
        assert_eq!(out.player_profit, 0.0);
        assert_eq!(out.house_profit, 0.0);
    }

    #[test]
    fn dealer_win_pays_nothing() {
        let out = game().resolve(&[1, 0], &[4, 4]).unwrap();
        assert!(!out.player_won);
        assert_eq!(out.payout, 0.0);
        assert_eq!(out.house_profit, 10.0);
    }

    #[test]
    fn short_or_bad_hands_are_rejected() {
        assert_eq!(
            game().resolve(&[5], &[3, 8]),
            Err(SimError::InsufficientCards {
                needed: 2,
                available: 1
            })
        );
        assert!(game().resolve(&[5, 7], &[]).is_err());
        assert!(matches!(
            game().resolve(&[5, 12], &[3, 8]),
            Err(SimError::InvalidConfiguration { field: "cards", .. })
        ));
    }

    #[test]
    fn staged_round() {
        let mut rng = ProvablyFairRng::new("l9", "client", 2);
        let (player, deck) = Lucky9::peek(&mut rng);
        assert_eq!(player.len(), 2);
        assert_eq!(deck.len(), 50);

        let (player, card, deck) = Lucky9::hit(&player, &deck).unwrap();
        assert_eq!(player.len(), 3);
        assert_eq!(player[2], card);
        assert_eq!(deck.len(), 49);

        let (out, deck) = game().finish(&player, &[], &deck).unwrap();
        assert_eq!(deck.len(), 47);
        let Detail::Cards { dealer_cards, .. } = &out.detail else {
            panic!("unexpected detail");
        };
        assert_eq!(dealer_cards.len(), 2);
    }

    #[test]
    fn finish_keeps_given_dealer_hand() {
        let deck = Deck(vec![1, 2, 3]);
        let (out, rest) = game().finish(&[5, 7], &[3, 8], &deck).unwrap();
        assert!(out.player_won);
        assert_eq!(rest, deck);
        assert!(game().finish(&[5, 7], &[], &Deck(vec![1])).is_err());
    }

    #[test]
    fn exact_odds_are_symmetric() {
        let (win, tie) = Lucky9::exact_odds();
        let loss = 1.0 - win - tie;
        assert!((win - loss).abs() < 1e-12);
        assert!(tie > 0.0 && tie < 0.2);
        // w == l, so 2w + t == 1 at the default multiplier
        assert!(game().theoretical_house_edge().unwrap().abs() < 1e-9);
    }

    #[test]
    fn simulated_rates_track_exact_odds() {
        let (win, tie) = Lucky9::exact_odds();
        let mut rng = ProvablyFairRng::new("l9", "client", 3);
        let n = 20_000;
        let outcomes: Vec<Outcome> = (0..n).map(|_| game().play(&mut rng)).collect();
        let wins = outcomes.iter().filter(|o| o.player_won).count() as f64 / n as f64;
        let ties = outcomes.iter().filter(|o| o.is_tie()).count() as f64 / n as f64;
        assert!((wins - win).abs() < 0.02, "wins {wins} vs {win}");
        assert!((ties - tie).abs() < 0.02, "ties {ties} vs {tie}");
    }
}
