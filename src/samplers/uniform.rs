//! Uniform random sampler drawing minimal samples without replacement.

use rand::rngs::StdRng;
use rand::Rng;

use crate::core::Sampler;
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing minimal samples without replacement.
pub struct UniformRandomSampler<R: Rng = StdRng> {
    rng: UniformRandomGenerator<R>,
}

impl Default for UniformRandomSampler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomSampler<StdRng> {
    /// Construct a new sampler with a random seed.
    pub fn new() -> Self {
        Self {
            rng: UniformRandomGenerator::new(),
        }
    }

    /// Construct a sampler from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: UniformRandomGenerator::from_seed(seed),
        }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::new(),
        }
    }
}

impl<R: Rng> UniformRandomSampler<R> {
    /// Use a caller-provided generator.
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng: UniformRandomGenerator::from_rng(rng),
        }
    }
}

impl<R: Rng> Sampler for UniformRandomSampler<R> {
    fn sample(&mut self, point_count: usize, sample_size: usize, out_indices: &mut [usize]) -> bool {
        if sample_size == 0
            || point_count == 0
            || sample_size > point_count
            || out_indices.len() < sample_size
        {
            return false;
        }

        self.rng
            .gen_unique(&mut out_indices[..sample_size], point_count)
    }
}
