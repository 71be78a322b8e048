//! Policy oracle interface
//!
//! The firm's optimal-markup policy comes from an external dynamic-
//! programming solve. The engine only depends on the capability interface
//! below:
//!
//! - [`PolicySolver::solve`] runs once at economy construction and produces
//!   the oracle (the expensive precompute),
//! - [`PolicyOracle::evaluate`] maps the per-firm state vector and regime to
//!   the new markup; it is pure and queried concurrently from every firm
//!   task, hence the `Send + Sync` bound,
//! - [`PolicyOracle::check_price_bound`] guards the aggregate log price
//!   against leaving the oracle's tabulated domain.
//!
//! Any concrete solver (tabulated value-function iteration, etc.) can stand
//! behind this interface. The [`SsBandPolicy`] here is a closed-form
//! inaction-band rule used as the baseline implementation, and
//! [`MockStickyPolicy`] never adjusts at all.
//!
//! NOTE: `MockStickyPolicy` is available in all builds to support
//! integration testing, but should only be used in test code.

mod band;
mod mock;

use std::sync::Arc;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::params::Parameters;

pub use band::{BandSolver, SsBandPolicy};
pub use mock::MockStickyPolicy;

/// Aggregate price left the oracle's valid operating domain
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Log aggregate price {log_price} outside oracle domain [{lower}, {upper}]")]
pub struct StabilityError {
    pub log_price: f64,
    pub lower: f64,
    pub upper: f64,
}

/// The policy solve itself failed
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Solver configuration invalid: {0}")]
    InvalidConfig(String),

    #[error("Policy solve did not converge: {0}")]
    NotConverged(String),
}

/// State vector handed to the oracle for one firm in one period
///
/// The original solver tabulates the policy over exactly these three
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyInput {
    /// Firm markup normalized by the period's productivity draw,
    /// `markup / exp(g + ea)`. Also the "no adjustment" markup: an oracle
    /// that returns this value leaves the firm's price unchanged.
    pub normalized_markup: f64,
    /// Aggregate money growth `g[t]`
    pub money_growth: f64,
    /// Lagged log aggregate price `p[t-1]`
    pub lagged_log_price: f64,
}

/// Precomputed optimal-markup policy
///
/// Implementations must be pure: the same input and regime always yield the
/// same markup, and concurrent `evaluate` calls must be safe.
pub trait PolicyOracle: Send + Sync {
    /// New markup for a firm with the given state vector and regime
    fn evaluate(&self, x: &PolicyInput, regime: usize) -> f64;

    /// Validate that the aggregate log price remains inside the oracle's
    /// valid domain
    fn check_price_bound(&self, log_price: f64) -> Result<(), StabilityError>;
}

/// One-time producer of a [`PolicyOracle`]
pub trait PolicySolver {
    /// Solve the firm problem for the constructed model
    ///
    /// # Arguments
    ///
    /// * `params` - Economic constants
    /// * `kappa` - Per-regime menu-cost values
    /// * `pi` - Regime transition matrix
    /// * `reg` - Regularization vector for the solver grid
    fn solve(
        &self,
        params: &Parameters,
        kappa: &[f64],
        pi: &DMatrix<f64>,
        reg: &[f64],
    ) -> Result<Arc<dyn PolicyOracle>, SolverError>;
}
