//! Randomness source passed explicitly to every stochastic operator.
//!
//! Operators never reach for a thread-local generator on their own. Given the
//! same sequence of draws they produce the same genome, which lets tests
//! script the draws exactly.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// The three kinds of draw the genome operators make.
pub trait RandomSource {
    /// Returns `true` with the given probability.
    ///
    /// Probabilities at or below zero never fire, at or above one always fire.
    fn chance(&mut self, probability: f64) -> bool;

    /// Draws a real uniformly from `[min, max)`, or `[min, max]` when `inclusive`.
    ///
    /// An empty range yields `min`.
    fn real(&mut self, min: f64, max: f64, inclusive: bool) -> f64;

    /// Draws an index uniformly from `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Picks one element uniformly, `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        items.get(self.index(items.len()))
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }

    fn real(&mut self, min: f64, max: f64, inclusive: bool) -> f64 {
        (**self).real(min, max, inclusive)
    }

    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wraps a generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<StdRng> {
    /// Reproducible source seeded from a single integer.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl RngSource<ThreadRng> {
    /// Source backed by the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn chance(&mut self, probability: f64) -> bool {
        // `random_bool` panics on NaN.
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.random_bool(probability)
    }

    fn real(&mut self, min: f64, max: f64, inclusive: bool) -> f64 {
        if min.is_nan() || max.is_nan() || max <= min {
            return min;
        }
        if inclusive {
            self.rng.random_range(min..=max)
        } else {
            self.rng.random_range(min..max)
        }
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}
