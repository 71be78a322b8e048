//! Steady-state inaction-band policy
//!
//! Closed-form stand-in for the tabulated dynamic-programming policy: a firm
//! reprices to the steady-state markup whenever its normalized markup has
//! drifted outside a per-regime log band, and keeps the drifted markup
//! otherwise. Higher-cost regimes get wider bands, which reproduces the
//! state-dependent adjustment pattern the simulation statistics are built
//! to measure.

use std::sync::Arc;

use nalgebra::DMatrix;

use super::{PolicyInput, PolicyOracle, PolicySolver, SolverError, StabilityError};
use crate::params::Parameters;

/// Inaction-band policy around the steady-state markup
///
/// # Example
///
/// ```
/// use pricing_simulator_core_rs::policy::{PolicyInput, PolicyOracle, SsBandPolicy};
///
/// let policy = SsBandPolicy::new(4.0 / 3.0, vec![0.05, 0.15], (-1.0, 1.0));
///
/// // Inside the band: keep the drifted markup.
/// let inside = PolicyInput {
///     normalized_markup: 4.0 / 3.0 * 1.01,
///     money_growth: 0.0,
///     lagged_log_price: 0.3,
/// };
/// assert_eq!(policy.evaluate(&inside, 0), inside.normalized_markup);
///
/// // Outside the band: reprice to the target.
/// let outside = PolicyInput { normalized_markup: 2.0, ..inside };
/// assert_eq!(policy.evaluate(&outside, 0), 4.0 / 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct SsBandPolicy {
    /// Reset markup (the steady-state markup gamma/(gamma-1))
    target: f64,
    /// Per-regime half-width of the log inaction band
    half_widths: Vec<f64>,
    /// Valid domain of the aggregate log price
    price_bounds: (f64, f64),
}

impl SsBandPolicy {
    /// Build a band policy
    ///
    /// # Panics
    ///
    /// Panics if `target` is not strictly positive or `half_widths` is
    /// empty; the solver entry point validates instead of panicking.
    pub fn new(target: f64, half_widths: Vec<f64>, price_bounds: (f64, f64)) -> Self {
        assert!(target > 0.0, "reset markup must be positive");
        assert!(!half_widths.is_empty(), "need at least one regime band");
        Self {
            target,
            half_widths,
            price_bounds,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl PolicyOracle for SsBandPolicy {
    fn evaluate(&self, x: &PolicyInput, regime: usize) -> f64 {
        let width = self.half_widths[regime.min(self.half_widths.len() - 1)];
        if (x.normalized_markup / self.target).ln().abs() > width {
            self.target
        } else {
            x.normalized_markup
        }
    }

    fn check_price_bound(&self, log_price: f64) -> Result<(), StabilityError> {
        let (lower, upper) = self.price_bounds;
        if log_price < lower || log_price > upper || !log_price.is_finite() {
            return Err(StabilityError {
                log_price,
                lower,
                upper,
            });
        }
        Ok(())
    }
}

/// Solver producing an [`SsBandPolicy`] from the model primitives
///
/// Band widths scale with the square root of each regime's menu cost
/// relative to the curvature `psi`; the regularization vector widens the
/// aggregate-price domain.
#[derive(Debug, Clone, Default)]
pub struct BandSolver;

impl PolicySolver for BandSolver {
    fn solve(
        &self,
        params: &Parameters,
        kappa: &[f64],
        pi: &DMatrix<f64>,
        reg: &[f64],
    ) -> Result<Arc<dyn PolicyOracle>, SolverError> {
        if kappa.len() != pi.nrows() {
            return Err(SolverError::InvalidConfig(format!(
                "kappa has {} regimes but transition matrix has {}",
                kappa.len(),
                pi.nrows()
            )));
        }
        if kappa.iter().any(|&k| k < 0.0) {
            return Err(SolverError::InvalidConfig(
                "menu costs must be non-negative".to_string(),
            ));
        }

        let half_widths = kappa
            .iter()
            .map(|&k| (2.0 * k / params.psi()).sqrt())
            .collect();

        // The aggregate log price of this economy lives near the log
        // steady-state markup; the regularization vector pads the domain.
        let center = params.steady_state_markup().ln();
        let pad = 1.0 + reg.iter().copied().fold(0.0, f64::max);
        let price_bounds = (center - pad, center + pad);

        Ok(Arc::new(SsBandPolicy::new(
            params.steady_state_markup(),
            half_widths,
            price_bounds,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::new(30.0, 0.99, 0.01, 0.005, 0.5, 4.0).unwrap()
    }

    #[test]
    fn test_keeps_markup_inside_band() {
        let policy = SsBandPolicy::new(4.0 / 3.0, vec![0.1], (-1.0, 1.0));
        let x = PolicyInput {
            normalized_markup: 4.0 / 3.0,
            money_growth: 0.01,
            lagged_log_price: 0.28,
        };
        assert_eq!(policy.evaluate(&x, 0), x.normalized_markup);
    }

    #[test]
    fn test_resets_outside_band() {
        let policy = SsBandPolicy::new(4.0 / 3.0, vec![0.1], (-1.0, 1.0));
        let x = PolicyInput {
            normalized_markup: 1.0,
            money_growth: 0.0,
            lagged_log_price: 0.28,
        };
        assert_eq!(policy.evaluate(&x, 0), 4.0 / 3.0);
    }

    #[test]
    fn test_wider_band_for_costlier_regime() {
        let policy = SsBandPolicy::new(4.0 / 3.0, vec![0.02, 0.5], (-1.0, 1.0));
        let x = PolicyInput {
            normalized_markup: 4.0 / 3.0 * 1.1,
            money_growth: 0.0,
            lagged_log_price: 0.28,
        };
        // ~9.5% deviation adjusts under the tight band, not the wide one.
        assert_eq!(policy.evaluate(&x, 0), 4.0 / 3.0);
        assert_eq!(policy.evaluate(&x, 1), x.normalized_markup);
    }

    #[test]
    fn test_price_bound_violation() {
        let policy = SsBandPolicy::new(4.0 / 3.0, vec![0.1], (-0.5, 0.5));
        assert!(policy.check_price_bound(0.3).is_ok());
        let err = policy.check_price_bound(0.9).unwrap_err();
        assert_eq!(err.log_price, 0.9);
        assert_eq!(err.upper, 0.5);
        assert!(policy.check_price_bound(f64::NAN).is_err());
    }

    #[test]
    fn test_solver_rejects_regime_mismatch() {
        let pi = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.5, 0.5]);
        let solver = BandSolver;
        assert!(solver.solve(&params(), &[1.0], &pi, &[]).is_err());
    }

    #[test]
    fn test_solver_builds_oracle() {
        let pi = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.5, 0.5]);
        let solver = BandSolver;
        let oracle = solver
            .solve(&params(), &[0.01, 0.05], &pi, &[0.2])
            .unwrap();
        // Domain centered on ln(4/3) and padded by 1.2.
        assert!(oracle.check_price_bound((4.0f64 / 3.0).ln()).is_ok());
        assert!(oracle.check_price_bound(2.0).is_err());
    }
}
