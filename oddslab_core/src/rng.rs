use hmac::{Hmac, Mac};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

// Deterministic RNG using provably-fair HMAC construction
// server_seed (secret) + client_seed + nonce -> HMAC-SHA256 -> block 0
// block n+1 = SHA256(block n); blocks are consumed as one byte stream

pub type HmacSha256 = Hmac<Sha256>;

const BLOCK_LEN: usize = 32;

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// The draw interface every game model consumes.
///
/// Blanket-implemented for any [`rand::Rng`], so seeded generators from the
/// `rand` ecosystem and [`ProvablyFairRng`] are interchangeable.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform face in `1..=sides`. `sides` must be non-zero.
    fn roll(&mut self, sides: u32) -> u32;

    /// Index drawn proportionally to `weights`. Weights need not sum to 1;
    /// an empty, negative or all-zero table yields 0.
    fn weighted_index(&mut self, weights: &[f64]) -> usize;

    /// Sample from N(mean, std_dev).
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Uniform random permutation in place.
    fn permute<T>(&mut self, items: &mut [T]);
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn roll(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }

    fn weighted_index(&mut self, weights: &[f64]) -> usize {
        match WeightedIndex::new(weights) {
            Ok(dist) => dist.sample(self),
            Err(_) => 0,
        }
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        // Box-Muller; u1 in (0, 1] keeps ln() finite
        let u1 = 1.0 - self.gen::<f64>();
        let u2 = self.gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn permute<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

#[derive(Clone)]
pub struct ProvablyFairRng {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
    block: [u8; BLOCK_LEN],
    cursor: usize,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        let mut rng = Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            block: [0u8; BLOCK_LEN],
            cursor: 0,
        };
        rng.block = rng.hmac_bytes();
        rng
    }

    /// Independent stream for the `stream`-th batch of a suite.
    pub fn fork(&self, stream: u64) -> Self {
        Self::new(
            self.server_seed.clone(),
            format!("{}#{}", self.client_seed, stream),
            self.nonce,
        )
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self) -> [u8; BLOCK_LEN] {
        let mut mac =
            HmacSha256::new_from_slice(self.server_seed.as_bytes()).expect("HMAC key");
        let msg = format!("{}:{}", self.client_seed, self.nonce);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; BLOCK_LEN];
        out.copy_from_slice(&res);
        out
    }

    fn next_byte(&mut self) -> u8 {
        if self.cursor == BLOCK_LEN {
            let next = Sha256::digest(self.block);
            self.block.copy_from_slice(&next);
            self.cursor = 0;
        }
        let b = self.block[self.cursor];
        self.cursor += 1;
        b
    }
}

impl RngCore for ProvablyFairRng {
    fn next_u32(&mut self) -> u32 {
        let mut chunk = [0u8; 4];
        self.fill_bytes(&mut chunk);
        u32::from_be_bytes(chunk)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = ProvablyFairRng::new("server", "client", 1);
        let mut rng2 = ProvablyFairRng::new("server", "client", 1);
        assert_eq!(rng1.server_seed_hash_hex(), rng2.server_seed_hash_hex());
        assert_eq!(rng1.hmac_bytes().to_vec(), rng2.hmac_bytes().to_vec());
        let a: Vec<u64> = (0..20).map(|_| rng1.next_u64()).collect();
        let b: Vec<u64> = (0..20).map(|_| rng2.next_u64()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonce_changes_stream() {
        let mut rng1 = ProvablyFairRng::new("server", "client", 1);
        let mut rng2 = ProvablyFairRng::new("server", "client", 2);
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_stream_crosses_block_boundary() {
        let mut rng = ProvablyFairRng::new("server", "client", 1);
        let first = rng.hmac_bytes();
        let mut bytes = [0u8; BLOCK_LEN * 3];
        rng.fill_bytes(&mut bytes);
        assert_eq!(&bytes[..BLOCK_LEN], &first[..]);
        assert_ne!(&bytes[BLOCK_LEN..BLOCK_LEN * 2], &first[..]);
        assert_ne!(
            &bytes[BLOCK_LEN..BLOCK_LEN * 2],
            &bytes[BLOCK_LEN * 2..]
        );
    }

    #[test]
    fn test_fork_is_independent_and_repeatable() {
        let base = ProvablyFairRng::new("server", "client", 9);
        let mut a1 = base.fork(0);
        let mut a2 = base.fork(0);
        let mut b = base.fork(1);
        let x = a1.next_u64();
        assert_eq!(x, a2.next_u64());
        assert_ne!(x, b.next_u64());
    }

    #[test]
    fn test_server_hash_is_sha256_hex() {
        let rng = ProvablyFairRng::new("server", "client", 0);
        let hash = rng.server_seed_hash_hex();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, derive_hash_hex(b"server"));
    }

    #[test]
    fn test_roll_stays_in_range() {
        let mut rng = ProvablyFairRng::new("server", "client", 3);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let face = rng.roll(6);
            assert!((1..=6).contains(&face));
            seen[(face - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = ProvablyFairRng::new("server", "client", 4);
        for _ in 0..500 {
            let idx = rng.weighted_index(&[0.0, 3.0, 0.0, 1.0, 0.0]);
            assert!(idx == 1 || idx == 3);
        }
    }

    #[test]
    fn test_weighted_index_degenerate_tables() {
        let mut rng = ProvablyFairRng::new("server", "client", 7);
        assert_eq!(rng.weighted_index(&[]), 0);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), 0);
        assert_eq!(rng.weighted_index(&[1.0, -1.0]), 0);
        assert_eq!(rng.weighted_index(&[0.0, 2.0]), 1);
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = ProvablyFairRng::new("server", "client", 5);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(5.0, 1.5)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.05, "mean {mean}");
        assert!((var.sqrt() - 1.5).abs() < 0.05, "std {}", var.sqrt());
    }

    #[test]
    fn test_permute_keeps_multiset() {
        let mut rng = ProvablyFairRng::new("server", "client", 6);
        let mut items: Vec<u8> = (0..20).collect();
        rng.permute(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<u8>>());
    }
}
