//! Injectable uniform random source and normal-variate sampling
//!
//! The simulation never touches a global RNG. Everything random flows through
//! [`UniformSource`], so tests can replay exact draws and a seed reproduces a run.

use rand::Rng;
use rand_pcg::Pcg32;

/// A source of uniform draws in the half-open interval `(0, 1]`
///
/// Zero is excluded so `ln(u)` in the Box-Muller transform is always finite.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

impl UniformSource for Pcg32 {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        // random::<f64>() is in [0, 1)
        1.0 - self.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct FixedDraws {
    draws: Vec<f64>,
    cursor: usize,
}

impl FixedDraws {
    /// Draws outside `(0, 1]` are clamped into range.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let draws: Vec<f64> = draws.into();
        let draws = if draws.is_empty() { vec![1.0] } else { draws };
        Self {
            draws: draws
                .into_iter()
                .map(|d| if d.is_nan() { 1.0 } else { d.clamp(f64::MIN_POSITIVE, 1.0) })
                .collect(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}

/// One standard normal variate from exactly two uniform draws (Box-Muller)
pub fn standard_normal<R: UniformSource + ?Sized>(rng: &mut R) -> f64 {
    let u = rng.next_unit();
    let v = rng.next_unit();
    (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos()
}

/// One normal variate with the given mean and standard deviation
#[inline]
pub fn gaussian<R: UniformSource + ?Sized>(mean: f64, std_dev: f64, rng: &mut R) -> f64 {
    standard_normal(rng) * std_dev + mean
}

/// Uniform index in `0..len` from a single draw
///
/// Returns 0 when `len` is 0.
pub fn pick_index<R: UniformSource + ?Sized>(len: usize, rng: &mut R) -> usize {
    if len == 0 {
        return 0;
    }
    // (0, 1] -> [0, len)
    let scaled = ((1.0 - rng.next_unit()) * len as f64) as usize;
    scaled.min(len - 1)
}

/// Uniform integer in `lo..=hi` from a single draw
pub fn range_inclusive<R: UniformSource + ?Sized>(lo: i64, hi: i64, rng: &mut R) -> i64 {
    if hi <= lo {
        return lo;
    }
    let span = (hi - lo + 1) as usize;
    lo + pick_index(span, rng) as i64
}
