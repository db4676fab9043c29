//! Seeded random streams for deterministic generation
//!
//! Every generated structure draws from a `SeededStream` rooted in the
//! session seed, so the same seed always reproduces the same universe.
//! Independent concerns (field layout, naming, morphology, autopilot)
//! derive their own sub-streams, so adding draws to one concern never
//! shifts the values another concern sees.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Multiplier used when folding a stream offset into a derived seed.
///
/// 64-bit golden-ratio constant from splitmix-style generators; it
/// spreads small consecutive offsets across the whole seed space.
const STREAM_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

// Fixed sub-stream offsets. One per concern.
pub const STREAM_UNIVERSE: u64 = 1;
pub const STREAM_GALAXY: u64 = 2;
pub const STREAM_SYSTEM: u64 = 3;
pub const STREAM_NAMING: u64 = 4;
pub const STREAM_COMPOSITION: u64 = 5;
pub const STREAM_SPECTRUM: u64 = 6;
pub const STREAM_AUTOPILOT: u64 = 7;
pub const STREAM_FIELD: u64 = 8;

/// A deterministic random stream that remembers its base seed.
///
/// Wraps `ChaCha8Rng` so the base seed stays available for deriving
/// sub-streams after the generator has advanced. ChaCha8's period is
/// far beyond any draw count a session reaches, so even million-point
/// fields never see a repeat of the stream state.
#[derive(Debug, Clone)]
pub struct SeededStream {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derive an independent stream for `offset` without advancing this one.
    ///
    /// The derived seed depends only on the base seed and the offset, so
    /// a sub-stream can be re-derived at any time and will replay the
    /// same sequence from the start.
    pub fn derive(&self, offset: u64) -> Self {
        Self::new(self.seed ^ offset.wrapping_mul(STREAM_MIX))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next uniform value in [0, 1).
    pub fn next(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform value in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next()
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Uniform integer in [lo, hi] inclusive.
    pub fn int_range(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..=hi)
    }

    /// Bernoulli draw with the given probability of `true`.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next() < probability
    }

    /// Draw a full-width seed, for rooting a child structure.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen::<u64>()
    }

    /// Uniform direction on the unit sphere (y-up world).
    pub fn unit_dir(&mut self) -> Vec3 {
        let y = self.range(-1.0, 1.0);
        let theta = self.range(0.0, std::f32::consts::TAU);
        let s = (1.0 - y * y).max(0.0).sqrt();
        Vec3::new(s * theta.cos(), y, s * theta.sin())
    }
}

/// Fold a world position into a seed.
///
/// Coordinates are quantized before hashing so the seed is stable under
/// float noise well below the quantization step. Structures that spawn
/// children from their location (galaxy points spawning star systems)
/// record this seed at generation time, before any later re-centering
/// moves the live position.
pub fn position_seed(position: Vec3) -> u64 {
    let qx = (position.x * 8.0).round() as i64 as u64;
    let qy = (position.y * 8.0).round() as i64 as u64;
    let qz = (position.z * 8.0).round() as i64 as u64;
    qx.wrapping_mul(374_761_393)
        .wrapping_add(qy.wrapping_mul(668_265_263))
        .wrapping_add(qz.wrapping_mul(1_274_126_177))
        .wrapping_mul(STREAM_MIX)
}
