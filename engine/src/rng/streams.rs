//! Seeded ChaCha streams and inverse-CDF sampling
//!
//! # Determinism
//!
//! Same seed → same sequence, and same (seed, period, firm) → same
//! sub-stream. This is CRITICAL for:
//! - Debugging (reproduce an exact run)
//! - Testing (verify behavior)
//! - Research (validate results across machines and thread counts)
//!
//! The master stream serves the strictly sequential draws (aggregate
//! money-growth innovation, initial regime cross-section). Each firm task
//! inside a period derives its own stream via [`DrawStreams::firm_stream`],
//! a pure function of (seed, period, firm), so the parallel fan-out never
//! contends on shared generator state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Run-scoped random source
///
/// # Example
///
/// ```
/// use pricing_simulator_core_rs::rng::DrawStreams;
///
/// let mut streams = DrawStreams::new(12345);
/// let u = streams.uniform();
/// assert!((0.0..1.0).contains(&u));
///
/// // Sub-streams are reproducible.
/// let mut a = streams.firm_stream(3, 17);
/// let mut b = streams.firm_stream(3, 17);
/// use rand::Rng;
/// assert_eq!(a.gen::<u64>(), b.gen::<u64>());
/// ```
#[derive(Debug, Clone)]
pub struct DrawStreams {
    seed: u64,
    master: ChaCha8Rng,
}

impl DrawStreams {
    /// Create a new draw source from a run seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            master: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Mutable access to the master stream for callers that need a plain
    /// [`rand::Rng`] (initial regime sampling)
    pub fn master_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.master
    }

    /// Standard normal draw from the master stream
    pub fn standard_normal(&mut self) -> f64 {
        self.master.sample(StandardNormal)
    }

    /// Uniform draw in [0, 1) from the master stream
    pub fn uniform(&mut self) -> f64 {
        self.master.gen::<f64>()
    }

    /// Independent sub-stream for one firm in one period
    ///
    /// Pure function of (seed, period, firm): the firm-to-task mapping can
    /// change freely without changing any draw.
    pub fn firm_stream(&self, period: usize, firm: usize) -> ChaCha8Rng {
        let mixed = splitmix64(
            self.seed
                ^ splitmix64(period as u64).rotate_left(17)
                ^ splitmix64(firm as u64).rotate_left(43),
        );
        ChaCha8Rng::seed_from_u64(mixed)
    }
}

/// SplitMix64 finalizer, used to spread (seed, period, firm) into
/// well-separated sub-stream seeds.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Inverse-CDF draw from a cumulative distribution
///
/// `cum` has `n + 1` entries `[0, c0, c0+c1, ..., 1]` for `n` outcomes.
/// Scans from the highest index downward and returns the first `j` with
/// `draw >= cum[j]`, so the boundary is inclusive on the lower edge of
/// each bucket.
///
/// # Panics
///
/// Panics if `cum` has fewer than two entries.
///
/// # Example
///
/// ```
/// use pricing_simulator_core_rs::rng::draw_discrete;
///
/// let cum = [0.0, 0.3, 0.7, 1.0];
/// assert_eq!(draw_discrete(&cum, 0.95), 2);
/// assert_eq!(draw_discrete(&cum, 0.1), 0);
/// assert_eq!(draw_discrete(&cum, 0.3), 1);
/// ```
pub fn draw_discrete(cum: &[f64], draw: f64) -> usize {
    assert!(
        cum.len() >= 2,
        "cumulative distribution needs at least one outcome"
    );
    for j in (0..cum.len() - 1).rev() {
        if draw >= cum[j] {
            return j;
        }
    }
    // cum[0] == 0 and draws are >= 0, so the scan always terminates above.
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_stream_deterministic() {
        let mut s1 = DrawStreams::new(12345);
        let mut s2 = DrawStreams::new(12345);
        for _ in 0..100 {
            assert_eq!(s1.standard_normal(), s2.standard_normal());
            assert_eq!(s1.uniform(), s2.uniform());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut s1 = DrawStreams::new(12345);
        let mut s2 = DrawStreams::new(54321);
        assert_ne!(s1.uniform(), s2.uniform());
    }

    #[test]
    fn test_firm_streams_reproducible_and_distinct() {
        let streams = DrawStreams::new(7);
        let mut a = streams.firm_stream(2, 5);
        let mut b = streams.firm_stream(2, 5);
        let mut c = streams.firm_stream(2, 6);
        let mut d = streams.firm_stream(3, 5);

        let va: u64 = a.gen();
        assert_eq!(va, b.gen::<u64>());
        assert_ne!(va, c.gen::<u64>());
        assert_ne!(va, d.gen::<u64>());
    }

    #[test]
    fn test_firm_stream_independent_of_master_position() {
        let mut streams = DrawStreams::new(99);
        let mut before = streams.firm_stream(1, 1);
        let _ = streams.uniform();
        let _ = streams.standard_normal();
        let mut after = streams.firm_stream(1, 1);
        assert_eq!(before.gen::<u64>(), after.gen::<u64>());
    }

    #[test]
    fn test_uniform_in_unit_interval() {
        let mut streams = DrawStreams::new(321);
        for _ in 0..1000 {
            let u = streams.uniform();
            assert!((0.0..1.0).contains(&u), "uniform out of range: {}", u);
        }
    }

    #[test]
    fn test_draw_discrete_boundaries() {
        let cum = [0.0, 0.3, 0.7, 1.0];
        assert_eq!(draw_discrete(&cum, 0.95), 2);
        assert_eq!(draw_discrete(&cum, 0.1), 0);
        assert_eq!(draw_discrete(&cum, 0.3), 1);
        assert_eq!(draw_discrete(&cum, 0.0), 0);
        assert_eq!(draw_discrete(&cum, 0.699999), 1);
    }

    #[test]
    fn test_draw_discrete_degenerate_distribution() {
        // All mass on the single outcome.
        let cum = [0.0, 1.0];
        assert_eq!(draw_discrete(&cum, 0.5), 0);
    }

    #[test]
    #[should_panic(expected = "at least one outcome")]
    fn test_draw_discrete_empty() {
        draw_discrete(&[0.0], 0.5);
    }
}
