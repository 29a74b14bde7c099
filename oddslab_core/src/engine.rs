use crate::{
    error::{check_bet, SimResult},
    game::Game,
    outcome::{Detail, Outcome},
    paytable::Paytable,
    rng::{ProvablyFairRng, RandomSource},
    stats::edge_from_rtp,
    symbols::{ReelsConfig, Symbol},
};

/// Paid when a triple has no paytable entry.
const FALLBACK_TRIPLE_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct SlotMachine {
    pub bet_amount: f64,
    pub reels: ReelsConfig,
    pub paytable: Paytable,
}

impl SlotMachine {
    pub fn new(bet_amount: f64) -> SimResult<Self> {
        Ok(Self {
            bet_amount: check_bet(bet_amount)?,
            reels: ReelsConfig::default_3_reel(),
            paytable: Paytable::triples_default(),
        })
    }

    /// Expected multiplier per spin: forced triples plus natural triples.
    pub fn theoretical_rtp(&self) -> f64 {
        let forced = self.reels.force_win_chance;
        let n = Symbol::ALL.len() as f64;
        Symbol::ALL
            .iter()
            .map(|s| {
                let w = self.reels.weights[s.to_index() as usize];
                let p_triple = (1.0 - forced) * w.powi(self.reels.reels as i32) + forced / n;
                p_triple * self.triple_multiplier(*s)
            })
            .sum()
    }

    fn triple_multiplier(&self, symbol: Symbol) -> f64 {
        self.paytable
            .multiplier(symbol, self.reels.reels as u8)
            .unwrap_or(FALLBACK_TRIPLE_MULTIPLIER)
    }
}

pub fn compute_spin<R: RandomSource + ?Sized>(rng: &mut R, reels: &ReelsConfig) -> Vec<Symbol> {
    // Forced win: every reel shows one uniformly picked symbol
    if rng.unit() < reels.force_win_chance {
        let idx = rng.roll(Symbol::ALL.len() as u32) - 1;
        return vec![Symbol::from_index(idx as u8); reels.reels];
    }
    (0..reels.reels)
        .map(|_| Symbol::from_index(rng.weighted_index(&reels.weights) as u8))
        .collect()
}

/// Most frequent symbol and how often it shows; the earliest symbol in
/// alphabet order wins a count tie.
pub fn dominant_symbol(spin: &[Symbol]) -> Option<(Symbol, usize)> {
    let mut counts = [0usize; 6];
    for s in spin {
        counts[s.to_index() as usize] += 1;
    }
    let mut best: Option<(Symbol, usize)> = None;
    for s in Symbol::ALL {
        let c = counts[s.to_index() as usize];
        if c > 0 && best.map_or(true, |(_, bc)| c > bc) {
            best = Some((s, c));
        }
    }
    best
}

/// Multiplier for a finished spin: only a full line of one symbol pays.
pub fn evaluate_multiplier(spin: &[Symbol], machine: &SlotMachine) -> f64 {
    match dominant_symbol(spin) {
        Some((symbol, count)) if count == machine.reels.reels => machine.triple_multiplier(symbol),
        _ => 0.0,
    }
}

pub fn settle_spin(spin: Vec<Symbol>, machine: &SlotMachine) -> Outcome {
    let multiplier = evaluate_multiplier(&spin, machine);
    let payout = machine.bet_amount * multiplier;
    Outcome::settle(
        machine.bet_amount,
        payout > 0.0,
        payout,
        Detail::Slot { spin, multiplier },
    )
}

pub fn spin_once<R: RandomSource + ?Sized>(rng: &mut R, machine: &SlotMachine) -> Outcome {
    let spin = compute_spin(rng, &machine.reels);
    settle_spin(spin, machine)
}

/// Convenience: perform a spin creating the RNG from seeds.
pub fn spin_with_seeds(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    machine: &SlotMachine,
) -> Outcome {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    spin_once(&mut rng, machine)
}

/// Verify that a revealed spin matches what the RNG would produce for the seeds.
pub fn verify_spin(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    reels: &ReelsConfig,
    expected: &[Symbol],
) -> bool {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    compute_spin(&mut rng, reels) == expected
}

impl Game for SlotMachine {
    fn name(&self) -> &'static str {
        "Slot Machine"
    }

    fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    fn play<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Outcome {
        spin_once(rng, self)
    }

    fn theoretical_house_edge(&self) -> Option<f64> {
        Some(edge_from_rtp(self.theoretical_rtp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> SlotMachine {
        SlotMachine::new(1.0).unwrap()
    }

    #[test]
    fn test_spin_deterministic() {
        let m = machine();
        let out1 = spin_with_seeds("server", "client", 1, &m);
        let out2 = spin_with_seeds("server", "client", 1, &m);
        assert_eq!(out1, out2);
    }

    #[test]
    fn test_forced_bar_triple_pays_25() {
        let m = SlotMachine::new(4.0).unwrap();
        let out = settle_spin(vec![Symbol::Bar; 3], &m);
        assert!(out.player_won);
        assert_eq!(out.payout, 100.0);
        match out.detail {
            Detail::Slot { multiplier, .. } => assert_eq!(multiplier, 25.0),
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn test_largest_stake_keeps_profits_finite() {
        assert!(SlotMachine::new(1e307).is_err());
        let m = SlotMachine::new(crate::error::MAX_BET).unwrap();
        let out = settle_spin(vec![Symbol::Bar; 3], &m);
        assert!(out.payout.is_finite());
        assert_eq!(out.player_profit + out.house_profit, 0.0);
    }

    #[test]
    fn test_pairs_pay_nothing() {
        let m = machine();
        let out = settle_spin(vec![Symbol::Seven, Symbol::Seven, Symbol::A], &m);
        assert!(!out.player_won);
        assert_eq!(out.payout, 0.0);
        assert_eq!(out.player_profit, -1.0);
    }

    #[test]
    fn test_dominant_symbol() {
        assert_eq!(
            dominant_symbol(&[Symbol::C, Symbol::A, Symbol::C]),
            Some((Symbol::C, 2))
        );
        assert_eq!(
            dominant_symbol(&[Symbol::Bar, Symbol::D, Symbol::B]),
            Some((Symbol::B, 1))
        );
        assert_eq!(dominant_symbol(&[]), None);
    }

    #[test]
    fn test_forced_wins_always_show() {
        let mut m = machine();
        m.reels.force_win_chance = 1.0;
        let mut rng = ProvablyFairRng::new("server", "client", 2);
        for _ in 0..200 {
            let out = m.play(&mut rng);
            assert!(out.player_won);
            assert!(out.payout >= 2.0);
        }
    }

    #[test]
    fn test_verify_spin() {
        let m = machine();
        let out = spin_with_seeds("server", "client", 3, &m);
        let Detail::Slot { spin, .. } = out.detail else {
            panic!("unexpected detail");
        };
        assert!(verify_spin("server", "client", 3, &m.reels, &spin));
        let mut tampered = spin.clone();
        tampered[0] = if tampered[0] == Symbol::A { Symbol::B } else { Symbol::A };
        assert!(!verify_spin("server", "client", 3, &m.reels, &tampered));
    }

    #[test]
    fn test_rtp_simulation_tracks_closed_form() {
        let m = machine();
        let rtp = m.theoretical_rtp();
        assert!(rtp > 0.5 && rtp < 1.5, "rtp {rtp}");
        let mut rng = ProvablyFairRng::new("server", "client", 4);
        let n = 50_000;
        let total: f64 = (0..n).map(|_| m.play(&mut rng).payout).sum();
        let simulated = total / n as f64;
        // per-spin payout std is roughly 3.5
        assert!((simulated - rtp).abs() < 0.08, "simulated {simulated} vs {rtp}");
    }
}
