// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Implementation of the generators under study.
//! All implement the RNG interface; [`Generator`] describes how the benchmark
//! obtains samples from each of them.

use rand::{RngCore, SeedableRng};

use crate::error::{Result, RqsError};

/// Outputs discarded after seeding by the small classic generators.
pub const BURN_IN: usize = 1000;

/// General trait for PRNGs
pub trait RNG {
    /// Initialize with specified seed.
    fn new(seed: u64) -> Self
    where
        Self: Sized;
    /// Generate u32 and advance the state one step.
    fn next_u32(&mut self) -> u32;
    /// Advance the generator state by the specified amount of steps.
    fn advance(&mut self, delta: usize) {
        for _ in 0..delta {
            let _ = self.next_u32();
        }
    }
    /// Collect the next `count` outputs.
    fn fill(&mut self, count: usize) -> Vec<u32> {
        (0..count).map(|_| self.next_u32()).collect()
    }
}

fn boxed<R: RNG + Send + 'static>(seed: u64) -> Box<dyn RNG + Send> {
    Box::new(R::new(seed))
}

/// How the benchmark obtains samples from a generator.
/// Seeded generators are reproducible; entropy sources ignore seeds.
#[derive(Debug, Clone, Copy)]
pub enum Generator {
    Seeded {
        name: &'static str,
        build: fn(u64) -> Box<dyn RNG + Send>,
    },
    Entropy {
        name: &'static str,
        draw: fn(usize) -> Result<Vec<u32>>,
    },
}

impl Generator {
    pub fn seeded<R: RNG + Send + 'static>(name: &'static str) -> Self {
        Generator::Seeded {
            name,
            build: boxed::<R>,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Generator::Seeded { name, .. } | Generator::Entropy { name, .. } => *name,
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, Generator::Seeded { .. })
    }

    /// Produce `count` samples. Seeded generators require a seed.
    pub fn produce(&self, count: usize, seed: Option<u64>) -> Result<Vec<u32>> {
        match (self, seed) {
            (Generator::Seeded { build, .. }, Some(seed)) => Ok(build(seed).fill(count)),
            (Generator::Seeded { name, .. }, None) => Err(RqsError::MissingSeed(name.to_string())),
            (Generator::Entropy { draw, .. }, _) => draw(count),
        }
    }
}

/// The generators compared by the study, plus the rand crate's default as a baseline.
pub fn default_generators() -> Vec<Generator> {
    vec![
        Generator::seeded::<lcg::Lcg32>("LCG"),
        Generator::seeded::<xorshift::XorShift32>("XORShift"),
        Generator::seeded::<Hybrid32>("Hybrid"),
        Generator::seeded::<mt::Mt19937>("MT19937"),
        Generator::seeded::<pcg::Pcg64>("PCG64"),
        Generator::Entropy {
            name: "CSPRNG",
            draw: os_entropy,
        },
        Generator::Entropy {
            name: "QuantumInspired",
            draw: whitened::sha256_whitened,
        },
        Generator::seeded::<ReferenceRand>("Reference"),
    ]
}

/// Generators with obviously broken output, useful to sanity check the scores.
pub fn degenerate_generators() -> Vec<Generator> {
    vec![
        Generator::seeded::<testgens::OnlyOne>("OnlyOnes"),
        Generator::seeded::<testgens::OnlyZero>("OnlyZero"),
        Generator::seeded::<testgens::AlternatingBlocks>("AlternatingBlocks"),
    ]
}

/// Read `count` u32 words straight from the operating system CSPRNG.
pub fn os_entropy(count: usize) -> Result<Vec<u32>> {
    let mut bytes = vec![0u8; count * 4];
    getrandom::fill(&mut bytes).map_err(|e| RqsError::EntropySource(e.to_string()))?;
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

pub struct ReferenceRand {
    rng: rand::rngs::StdRng,
}

impl RNG for ReferenceRand {
    fn new(seed: u64) -> Self {
        ReferenceRand {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

/// LCG output xor'ed with the rotated XORShift output, both started from the same seed.
#[derive(Debug, Copy, Clone)]
pub struct Hybrid32 {
    lcg: lcg::Lcg32,
    xorshift: xorshift::XorShift32,
}

impl RNG for Hybrid32 {
    fn new(seed: u64) -> Self {
        let mut rng = Hybrid32 {
            lcg: lcg::Lcg32::from_state(seed as u32),
            xorshift: xorshift::XorShift32::from_state(seed as u32),
        };
        rng.advance(BURN_IN);
        rng
    }

    fn next_u32(&mut self) -> u32 {
        self.lcg.next_u32() ^ self.xorshift.next_u32().rotate_left(13)
    }
}

// Linear congruential generators
pub mod lcg {
    use super::{RNG, BURN_IN};

    /// Numerical Recipes 32 bit LCG.
    #[derive(Debug, Copy, Clone)]
    pub struct Lcg32 {
        state: u32,
    }

    impl Lcg32 {
        /// Start directly from `state`, without burn-in.
        pub fn from_state(state: u32) -> Self {
            Lcg32 { state }
        }
    }

    impl RNG for Lcg32 {
        fn new(seed: u64) -> Self {
            let mut rng = Lcg32::from_state(seed as u32);
            rng.advance(BURN_IN);
            rng
        }

        fn next_u32(&mut self) -> u32 {
            self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
            self.state
        }
    }
}

// Xorshift PRNGs
pub mod xorshift {
    use super::{RNG, BURN_IN};

    /// Marsaglia's 13/17/5 xorshift. A zero seed never leaves zero.
    #[derive(Debug, Copy, Clone)]
    pub struct XorShift32 {
        state: u32,
    }

    impl XorShift32 {
        /// Start directly from `state`, without burn-in.
        pub fn from_state(state: u32) -> Self {
            XorShift32 { state }
        }
    }

    impl RNG for XorShift32 {
        fn new(seed: u64) -> Self {
            let mut rng = XorShift32::from_state(seed as u32);
            rng.advance(BURN_IN);
            rng
        }

        fn next_u32(&mut self) -> u32 {
            let mut x = self.state;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.state = x;
            x
        }
    }
}

/// Mersenne Twister, 32 bit reference variant.
pub mod mt {
    use super::RNG;
    const N: usize = 624;
    const M: usize = 397;
    const MATRIX_A: u32 = 0x9908b0df;
    const UPPER_MASK: u32 = 0x80000000;
    const LOWER_MASK: u32 = 0x7fffffff;

    #[derive(Debug, Clone)]
    pub struct Mt19937 {
        state: [u32; N],
        index: usize,
    }

    impl Mt19937 {
        /// Reference `init_genrand` seeding.
        pub fn from_u32(seed: u32) -> Self {
            let mut state = [0u32; N];
            state[0] = seed;
            for i in 1..N {
                let prev = state[i - 1];
                state[i] = 1812433253u32
                    .wrapping_mul(prev ^ (prev >> 30))
                    .wrapping_add(i as u32);
            }
            Mt19937 { state, index: N }
        }

        fn twist(&mut self) {
            for i in 0..N {
                let y = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % N] & LOWER_MASK);
                let mut next = self.state[(i + M) % N] ^ (y >> 1);
                if y & 1 != 0 {
                    next ^= MATRIX_A;
                }
                self.state[i] = next;
            }
            self.index = 0;
        }
    }

    impl RNG for Mt19937 {
        /// The two halves of the seed are folded into one u32.
        fn new(seed: u64) -> Self {
            Mt19937::from_u32((seed as u32) ^ ((seed >> 32) as u32))
        }

        fn next_u32(&mut self) -> u32 {
            if self.index >= N {
                self.twist();
            }
            let mut y = self.state[self.index];
            self.index += 1;
            y ^= y >> 11;
            y ^= (y << 7) & 0x9d2c5680;
            y ^= (y << 15) & 0xefc60000;
            y ^ (y >> 18)
        }
    }
}

/// Permuted congruential generator, XSL-RR 128/64.
pub mod pcg {
    use super::RNG;
    const MULTIPLIER: u128 = 0x2360ed051fc65da44385df649fccf645;

    pub(crate) fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    #[derive(Debug, Copy, Clone)]
    pub struct Pcg64 {
        state: u128,
        increment: u128,
        // High half of the last u64, handed out by the next u32 call.
        spare: Option<u32>,
    }

    impl Pcg64 {
        pub fn from_parts(init_state: u128, sequence: u128) -> Self {
            let mut rng = Pcg64 {
                state: 0,
                increment: (sequence << 1) | 1,
                spare: None,
            };
            rng.step();
            rng.state = rng.state.wrapping_add(init_state);
            rng.step();
            rng
        }

        fn step(&mut self) {
            self.state = self
                .state
                .wrapping_mul(MULTIPLIER)
                .wrapping_add(self.increment);
        }

        pub fn next_u64(&mut self) -> u64 {
            self.step();
            let rot = (self.state >> 122) as u32;
            let xsl = ((self.state >> 64) as u64) ^ (self.state as u64);
            xsl.rotate_right(rot)
        }
    }

    impl RNG for Pcg64 {
        /// State and stream are expanded from the seed with SplitMix64.
        fn new(seed: u64) -> Self {
            let mut sm = seed;
            let state = (splitmix64(&mut sm) as u128) << 64 | splitmix64(&mut sm) as u128;
            let sequence = (splitmix64(&mut sm) as u128) << 64 | splitmix64(&mut sm) as u128;
            Pcg64::from_parts(state, sequence)
        }

        /// Low half of each u64 first, then the high half.
        fn next_u32(&mut self) -> u32 {
            if let Some(high) = self.spare.take() {
                return high;
            }
            let word = self.next_u64();
            self.spare = Some((word >> 32) as u32);
            word as u32
        }
    }
}

/// Counter mode SHA-256 over a 32 byte entropy pool.
pub mod whitened {
    use sha2::{Digest, Sha256};

    use super::RNG;
    use crate::error::{Result, RqsError};

    const WORDS_PER_BLOCK: usize = 8;

    #[derive(Debug, Clone)]
    pub struct Sha256Whitened {
        pool: [u8; 32],
        counter: u64,
        block: [u32; WORDS_PER_BLOCK],
        position: usize,
    }

    impl Sha256Whitened {
        pub fn from_pool(pool: [u8; 32]) -> Self {
            Sha256Whitened {
                pool,
                counter: 0,
                block: [0; WORDS_PER_BLOCK],
                position: WORDS_PER_BLOCK,
            }
        }

        /// Hash `counter || pool` into the next block of eight little endian words.
        fn refill(&mut self) {
            let mut hasher = Sha256::new();
            hasher.update(self.counter.to_le_bytes());
            hasher.update(self.pool);
            let digest = hasher.finalize();
            for (word, c) in self.block.iter_mut().zip(digest.chunks_exact(4)) {
                *word = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            }
            self.counter += 1;
            self.position = 0;
        }
    }

    impl RNG for Sha256Whitened {
        /// Reproducible variant for testing: the seed fills the first 8 bytes
        /// of the pool. The benchmark draws its pool from the OS instead.
        fn new(seed: u64) -> Self {
            let mut pool = [0u8; 32];
            pool[0..8].clone_from_slice(&seed.to_le_bytes());
            Sha256Whitened::from_pool(pool)
        }

        fn next_u32(&mut self) -> u32 {
            if self.position == WORDS_PER_BLOCK {
                self.refill();
            }
            let word = self.block[self.position];
            self.position += 1;
            word
        }
    }

    /// Whiten a fresh OS entropy pool into `count` words.
    pub fn sha256_whitened(count: usize) -> Result<Vec<u32>> {
        let mut pool = [0u8; 32];
        getrandom::fill(&mut pool).map_err(|e| RqsError::EntropySource(e.to_string()))?;
        Ok(Sha256Whitened::from_pool(pool).fill(count))
    }
}

pub mod testgens {
    use super::RNG;

    pub struct OnlyOne {}
    impl RNG for OnlyOne {
        fn new(_seed: u64) -> Self {
            OnlyOne {}
        }

        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn advance(&mut self, _delta: usize) {}
    }

    pub struct OnlyZero {}
    impl RNG for OnlyZero {
        fn new(_seed: u64) -> Self {
            OnlyZero {}
        }

        fn next_u32(&mut self) -> u32 {
            0
        }

        fn advance(&mut self, _delta: usize) {}
    }

    /// Flips between all zeros and all ones on every output.
    pub struct AlternatingBlocks {
        state: u32,
    }
    impl RNG for AlternatingBlocks {
        fn new(_seed: u64) -> Self {
            AlternatingBlocks { state: u32::MAX }
        }

        fn next_u32(&mut self) -> u32 {
            self.advance(1);
            self.state
        }

        fn advance(&mut self, delta: usize) {
            if delta & 1 == 1 {
                self.state = !self.state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_matches_numerical_recipes_sequence() {
        let mut r = lcg::Lcg32::from_state(0);
        assert_eq!(r.fill(4), vec![1013904223, 1196435762, 3519870697, 2868466484]);
    }

    #[test]
    fn seeding_applies_burn_in() {
        let mut raw = lcg::Lcg32::from_state(42);
        raw.advance(BURN_IN);
        let mut seeded = lcg::Lcg32::new(42);
        assert_eq!(raw.fill(8), seeded.fill(8));
    }

    #[test]
    fn xorshift_first_output() {
        let mut r = xorshift::XorShift32::from_state(1);
        assert_eq!(r.next_u32(), 270369);
    }

    #[test]
    fn xorshift_zero_seed_sticks() {
        let mut r = xorshift::XorShift32::new(0);
        assert!(r.fill(16).iter().all(|&x| x == 0));
    }

    #[test]
    fn hybrid_combines_components() {
        let mut l = lcg::Lcg32::from_state(7);
        let mut x = xorshift::XorShift32::from_state(7);
        l.advance(BURN_IN);
        x.advance(BURN_IN);
        let mut h = Hybrid32::new(7);
        for _ in 0..16 {
            assert_eq!(h.next_u32(), l.next_u32() ^ x.next_u32().rotate_left(13));
        }
    }

    #[test]
    fn mt19937_reference_output() {
        let mut r = mt::Mt19937::new(5489);
        assert_eq!(r.next_u32(), 3499211612);
        assert_eq!(r.next_u32(), 581869302);
    }

    #[test]
    fn splitmix_reference_output() {
        let mut state = 0u64;
        assert_eq!(pcg::splitmix64(&mut state), 0xe220a8397b1dcdaf);
    }

    #[test]
    fn pcg_u32_splits_u64_low_first() {
        let mut a = pcg::Pcg64::new(9001);
        let mut b = a;
        let word = b.next_u64();
        assert_eq!(a.next_u32(), word as u32);
        assert_eq!(a.next_u32(), (word >> 32) as u32);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        for generator in default_generators().iter().filter(|g| g.is_seeded()) {
            let a = generator.produce(64, Some(1337)).unwrap();
            let b = generator.produce(64, Some(1337)).unwrap();
            let c = generator.produce(64, Some(1338)).unwrap();
            assert_eq!(a, b, "{}", generator.name());
            assert_ne!(a, c, "{}", generator.name());
        }
    }

    #[test]
    fn seeded_generator_requires_seed() {
        let generator = Generator::seeded::<lcg::Lcg32>("LCG");
        assert!(matches!(
            generator.produce(4, None),
            Err(RqsError::MissingSeed(_))
        ));
    }

    #[test]
    fn entropy_sources_ignore_seed() {
        for generator in default_generators().iter().filter(|g| !g.is_seeded()) {
            assert_eq!(generator.produce(37, None).unwrap().len(), 37);
            assert_eq!(generator.produce(5, Some(42)).unwrap().len(), 5);
        }
    }

    #[test]
    fn whitened_blocks_follow_counter() {
        let pool = [0x5a; 32];
        let mut r = whitened::Sha256Whitened::from_pool(pool);
        let first = r.fill(8);
        let second = r.fill(8);
        assert_ne!(first, second);
        let mut again = whitened::Sha256Whitened::from_pool(pool);
        assert_eq!(again.fill(12)[..8], first[..]);
        assert_ne!(whitened::Sha256Whitened::new(3).fill(8), first);
    }

    #[test]
    fn testgens_output() {
        let mut r = testgens::AlternatingBlocks::new(0);
        assert_eq!(r.fill(4), vec![0, u32::MAX, 0, u32::MAX]);
        assert_eq!(testgens::OnlyOne::new(0).fill(2), vec![u32::MAX; 2]);
        assert_eq!(testgens::OnlyZero::new(0).fill(2), vec![0; 2]);
    }
}
