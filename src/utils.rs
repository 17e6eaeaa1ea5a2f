//! Miscellaneous utilities shared across the crate.
//!
//! The main piece is a small wrapper around `rand` used by the samplers to draw
//! unique index sets. The generator is always explicit and can be seeded, so a
//! RANSAC run is reproducible when the caller asks for it.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Marker trait that requires `Sync` only when the `parallel` feature is on.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync + ?Sized> MaybeSync for T {}

/// Marker trait that requires `Sync` only when the `parallel` feature is on.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSync for T {}

/// Uniform generator of unique index sets.
///
/// By default this uses an entropy-seeded [`StdRng`], but any [`Rng`] can be
/// injected and test code can construct it from a fixed seed.
pub struct UniformRandomGenerator<R: Rng = StdRng> {
    rng: R,
}

impl UniformRandomGenerator<StdRng> {
    /// Construct with a random seed (suitable for production use).
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Construct with a fixed seed (useful for tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformRandomGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> UniformRandomGenerator<R> {
    /// Wrap an existing generator.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Fill `out` with distinct indices drawn uniformly from `[0, upper)`.
    ///
    /// Returns `false` when `out` is longer than the range. Asking for the
    /// whole range yields `0..upper` in order, without touching the generator.
    pub fn gen_unique(&mut self, out: &mut [usize], upper: usize) -> bool {
        let k = out.len();
        if k > upper {
            return false;
        }
        if k == upper {
            out.iter_mut().enumerate().for_each(|(i, v)| *v = i);
            return true;
        }

        if 2 * k <= upper {
            // Rejection sampling; cheap for the small minimal samples.
            let dist = Uniform::new(0, upper);
            for i in 0..k {
                loop {
                    let candidate = dist.sample(&mut self.rng);
                    if out[..i].iter().all(|&v| v != candidate) {
                        out[i] = candidate;
                        break;
                    }
                }
            }
        } else {
            let picked = rand::seq::index::sample(&mut self.rng, upper, k);
            for (slot, idx) in out.iter_mut().zip(picked.iter()) {
                *slot = idx;
            }
        }
        true
    }
}

/// Root mean square from a sum of squared residuals.
pub(crate) fn rmse(sum_squared: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (sum_squared / count as f64).sqrt()
}
