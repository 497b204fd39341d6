use rand::{rngs::OsRng, RngCore, SeedableRng};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

const PCG_MULTIPLIER: u64 = 6364136223846793005;
const DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const DEFAULT_INC: u64 = 0xda3e39cb94b95bdb;
const WARMUP_ROUNDS: usize = 10;

/// PCG32 generator behind every piece of gameplay randomness: shuffles,
/// AI bets, random triggers, random tag targets. Nothing else in the
/// crate is allowed to produce randomness.
#[derive(Debug, Clone)]
pub struct GameRng {
    state: u64,
    inc: u64,
    seed: u64,
}

impl GameRng {
    /// Deterministic generator for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Self {
            state: seed,
            inc: DEFAULT_INC,
            seed,
        };
        rng.warm_up();
        rng
    }

    /// Seeds from OS entropy, falling back to time xor pid when the
    /// entropy source is unavailable.
    pub fn from_entropy() -> Self {
        let mut seed_bytes = [0u8; 16];
        if OsRng.try_fill_bytes(&mut seed_bytes).is_ok() {
            let state = u64::from_le_bytes(seed_bytes[..8].try_into().unwrap());
            let stream = u64::from_le_bytes(seed_bytes[8..].try_into().unwrap());
            let mut rng = Self {
                state,
                inc: (stream << 1) | 1,
                seed: state,
            };
            rng.warm_up();
            return rng;
        }

        log::warn!("rng: entropy source unavailable, falling back to time+pid seed");
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let pid = process::id() as u64;
        let seed = time ^ (pid << 32);
        let mut rng = Self {
            state: seed,
            inc: (pid << 1) | 1,
            seed,
        };
        rng.warm_up();
        rng
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn warm_up(&mut self) {
        for _ in 0..WARMUP_ROUNDS {
            self.step();
        }
    }

    /// One PCG32 step: LCG state advance, XSH-RR output permutation.
    fn step(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG_MULTIPLIER).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Inclusive, unbiased integer in [min, max]. An inverted range is
    /// swapped rather than rejected.
    pub fn int_in(&mut self, min: i64, max: i64) -> i64 {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        if min == max {
            return min;
        }

        // Rejection sampling to strip modulo bias.
        let range = (max - min + 1) as u32;
        let threshold = (u32::MAX - range + 1) % range;
        loop {
            let value = self.step();
            if value >= threshold {
                return min + (value % range) as i64;
            }
        }
    }

    /// Uniform float on [min, max]; inverted ranges swap.
    pub fn float_in(&mut self, min: f64, max: f64) -> f64 {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        let unit = self.step() as f64 / u32::MAX as f64;
        min + unit * (max - min)
    }

    /// Bernoulli roll, true with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.float_in(0.0, 1.0) < p
    }

    pub fn coin(&mut self) -> bool {
        self.step() & 1 == 1
    }

    /// In-place Fisher-Yates using `int_in(0, i)`.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int_in(0, i as i64) as usize;
            items.swap(i, j);
        }
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        (self.step() as u64) << 32 | self.step() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for GameRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        GameRng::from_seed(u64::from_le_bytes(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        let mut rng = Self {
            state: DEFAULT_STATE,
            inc: DEFAULT_INC,
            seed: DEFAULT_STATE,
        };
        rng.warm_up();
        rng
    }
}
