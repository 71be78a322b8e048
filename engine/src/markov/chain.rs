//! Regime chain: cumulative transition rows and stationary distribution
//!
//! # Stationary distribution
//!
//! The stationary distribution is the left eigenvector of the transition
//! matrix for eigenvalue 1. It is computed spectrally by power iteration on
//! the lazy transpose `(Piᵀ + I)/2`, which has the same fixed point but a
//! strictly dominant unit eigenvalue, so periodic chains converge too. The
//! result is renormalized to sum to 1 and checked against the fixed-point
//! residual `‖Piᵀ·v − v‖∞`; a well-formed stochastic matrix always passes,
//! so a failure is surfaced as a numerical error instead of proceeding with
//! a non-probability vector.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use thiserror::Error;

use crate::rng::draw_discrete;

/// Tolerance for row sums when validating stochasticity
const ROW_SUM_TOL: f64 = 1e-9;

/// Fixed-point residual tolerance for the stationary distribution
const STATIONARY_TOL: f64 = 1e-9;

/// Convergence threshold and iteration cap for the power iteration
const POWER_TOL: f64 = 1e-14;
const POWER_MAX_ITERS: usize = 50_000;

/// Errors from chain construction
#[derive(Debug, Error, PartialEq)]
pub enum MarkovError {
    #[error("Transition matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Transition matrix must have at least one regime")]
    Empty,

    #[error("Row {row} is not a probability distribution (sum = {sum})")]
    NotStochastic { row: usize, sum: f64 },

    #[error("No eigenvector with eigenvalue 1 found (residual = {residual})")]
    NoUnitEigenvector { residual: f64 },
}

/// Discrete menu-cost regime chain
///
/// # Example
///
/// ```
/// use nalgebra::DMatrix;
/// use pricing_simulator_core_rs::markov::RegimeChain;
///
/// let pi = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.5, 0.5]);
/// let chain = RegimeChain::new(pi).unwrap();
/// assert_eq!(chain.n_regimes(), 2);
///
/// // Stationary distribution of this chain is [5/6, 1/6].
/// assert!((chain.stationary()[0] - 5.0 / 6.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct RegimeChain {
    pi: DMatrix<f64>,
    /// Per-regime cumulative transition row, `[0, .., 1]`, length n + 1
    cum_rows: Vec<Vec<f64>>,
    /// Stationary distribution, length n, sums to 1
    stationary: Vec<f64>,
    /// Cumulative stationary distribution, `[0, .., 1]`, length n + 1
    cum_stationary: Vec<f64>,
}

impl RegimeChain {
    /// Build the chain from a row-stochastic transition matrix
    ///
    /// # Returns
    ///
    /// * `Ok(RegimeChain)` with cumulative rows and stationary distribution
    /// * `Err(MarkovError)` if the matrix is not square/stochastic or the
    ///   stationary fixed point cannot be located numerically
    pub fn new(pi: DMatrix<f64>) -> Result<Self, MarkovError> {
        let n = pi.nrows();
        if n == 0 {
            return Err(MarkovError::Empty);
        }
        if pi.ncols() != n {
            return Err(MarkovError::NotSquare {
                rows: n,
                cols: pi.ncols(),
            });
        }
        for i in 0..n {
            let row = pi.row(i);
            if row.iter().any(|&x| x < 0.0 || !x.is_finite()) {
                return Err(MarkovError::NotStochastic {
                    row: i,
                    sum: f64::NAN,
                });
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOL {
                return Err(MarkovError::NotStochastic { row: i, sum });
            }
        }

        let cum_rows = (0..n)
            .map(|i| cumulative(pi.row(i).iter().copied()))
            .collect();

        let stationary = stationary_distribution(&pi)?;
        let cum_stationary = cumulative(stationary.iter().copied());

        Ok(Self {
            pi,
            cum_rows,
            stationary,
            cum_stationary,
        })
    }

    /// Number of regimes
    pub fn n_regimes(&self) -> usize {
        self.pi.nrows()
    }

    /// Transition matrix
    pub fn pi(&self) -> &DMatrix<f64> {
        &self.pi
    }

    /// Stationary distribution (non-negative, sums to 1)
    pub fn stationary(&self) -> &[f64] {
        &self.stationary
    }

    /// Cumulative transition rows, one `[0, .., 1]` vector per regime
    pub fn cum_rows(&self) -> &[Vec<f64>] {
        &self.cum_rows
    }

    /// Sample an initial regime from the stationary distribution
    ///
    /// Used to seed the firm cross-section at the start of a run. The draw
    /// always lands in `[0, n_regimes)`.
    pub fn draw_initial_regime<R: Rng>(&self, rng: &mut R) -> usize {
        draw_discrete(&self.cum_stationary, rng.gen::<f64>())
    }

    /// Sample the next regime conditional on the current one
    pub fn draw_next_regime<R: Rng>(&self, current: usize, rng: &mut R) -> usize {
        draw_discrete(&self.cum_rows[current], rng.gen::<f64>())
    }
}

/// Row-wise cumulative sum prefixed with a zero, closed at exactly 1
fn cumulative(probs: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut cum = vec![0.0];
    let mut acc = 0.0;
    for p in probs {
        acc += p;
        cum.push(acc);
    }
    // Pin the final edge so a uniform draw of 1 - eps never escapes the
    // last bucket through accumulated rounding.
    if let Some(last) = cum.last_mut() {
        *last = 1.0;
    }
    cum
}

/// Left eigenvector of `pi` for eigenvalue 1, normalized to sum to 1
fn stationary_distribution(pi: &DMatrix<f64>) -> Result<Vec<f64>, MarkovError> {
    let n = pi.nrows();
    let pi_t = pi.transpose();
    let mut v = DVector::from_element(n, 1.0 / n as f64);

    for _ in 0..POWER_MAX_ITERS {
        // Lazy-chain step: (Piᵀ v + v) / 2 keeps the sum at 1 exactly.
        let next = (&pi_t * &v + &v) * 0.5;
        let delta = (&next - &v).amax();
        v = next;
        if delta < POWER_TOL {
            break;
        }
    }

    let total: f64 = v.iter().sum();
    let v = v / total;

    let residual = (&pi_t * &v - &v).amax();
    if residual > STATIONARY_TOL {
        return Err(MarkovError::NoUnitEigenvector { residual });
    }

    Ok(v.iter().copied().collect())
}
