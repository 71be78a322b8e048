//! OLS summary regression of inflation dynamics
//!
//! Fits `p[t] = a + b·g[t] + c·p[t-1] + e` over the post-burn-in sample via
//! the normal equations. A singular or near-singular design (degenerate or
//! too-short sample) is reported to the caller instead of returning silently
//! wrong coefficients.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Relative singular-value cutoff for declaring `XᵀX` unusable
const CONDITION_TOL: f64 = 1e-12;

/// Errors from the regression fit
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegressionError {
    #[error("Regression sample too short: {len} observations, need at least {min}")]
    SampleTooShort { len: usize, min: usize },

    #[error("Design matrix is singular or near-singular (condition ratio {ratio:e})")]
    SingularDesign { ratio: f64 },

    #[error("Burn-in {t_burn} leaves no post-burn-in sample before {t_max}")]
    WindowEmpty { t_burn: usize, t_max: usize },
}

/// Fitted coefficients of the inflation regression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionFit {
    /// Constant `a`
    pub intercept: f64,
    /// Money-growth loading `b`
    pub growth_coef: f64,
    /// Lagged-log-price loading `c`
    pub lagged_price_coef: f64,
}

impl RegressionFit {
    /// Coefficients as the `[a, b, c]` vector
    pub fn coefficients(&self) -> [f64; 3] {
        [self.intercept, self.growth_coef, self.lagged_price_coef]
    }
}

/// Fit `p[t] = a + b·g[t] + c·p[t-1]` over `t in [t_burn + 2, t_max]`
///
/// The dependent vector is `p[t_burn+2..=t_max]`; each design row is
/// `[1, g[t], p[t-1]]`, aligned row for row.
pub fn fit_inflation_regression(
    p: &[f64],
    g: &[f64],
    t_burn: usize,
    t_max: usize,
) -> Result<RegressionFit, RegressionError> {
    if t_burn + 2 > t_max {
        return Err(RegressionError::WindowEmpty { t_burn, t_max });
    }
    let n = t_max - t_burn - 1;
    debug_assert!(p.len() > t_max && g.len() > t_max);

    let mut x = DMatrix::zeros(n, 3);
    let mut y = DVector::zeros(n);
    for (row, t) in (t_burn + 2..=t_max).enumerate() {
        x[(row, 0)] = 1.0;
        x[(row, 1)] = g[t];
        x[(row, 2)] = p[t - 1];
        y[row] = p[t];
    }

    ols(&x, &y)
}

/// Solve `(XᵀX) beta = Xᵀ y`
fn ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<RegressionFit, RegressionError> {
    let k = x.ncols();
    if x.nrows() < k {
        return Err(RegressionError::SampleTooShort {
            len: x.nrows(),
            min: k,
        });
    }

    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;

    // Detect degeneracy before solving: the normal equations happily
    // "solve" ill-conditioned systems into garbage.
    let singular_values = xtx.clone().svd(false, false).singular_values;
    let s_max = singular_values.max();
    let s_min = singular_values.min();
    let ratio = if s_max > 0.0 { s_min / s_max } else { 0.0 };
    if ratio < CONDITION_TOL {
        return Err(RegressionError::SingularDesign { ratio });
    }

    let beta = xtx
        .lu()
        .solve(&xty)
        .ok_or(RegressionError::SingularDesign { ratio })?;

    Ok(RegressionFit {
        intercept: beta[0],
        growth_coef: beta[1],
        lagged_price_coef: beta[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build noise-free series from known coefficients and recover them.
    #[test]
    fn test_recovers_exact_coefficients() {
        let (a, b, c) = (0.02, 0.8, 0.5);
        let t_max = 40;
        let mut g = vec![0.0; t_max + 1];
        let mut p = vec![0.0; t_max + 1];
        p[0] = 0.3;
        for t in 1..=t_max {
            // Deterministic but non-degenerate regressor path.
            g[t] = 0.01 * ((t as f64) * 0.7).sin() + 0.002 * (t as f64 % 5.0);
            p[t] = a + b * g[t] + c * p[t - 1];
        }

        let fit = fit_inflation_regression(&p, &g, 5, t_max).unwrap();
        assert!((fit.intercept - a).abs() < 1e-8, "a = {}", fit.intercept);
        assert!((fit.growth_coef - b).abs() < 1e-8, "b = {}", fit.growth_coef);
        assert!(
            (fit.lagged_price_coef - c).abs() < 1e-8,
            "c = {}",
            fit.lagged_price_coef
        );
    }

    #[test]
    fn test_singular_design_reported() {
        // Constant p and zero g: columns 0 and 2 are collinear.
        let p = vec![0.5; 21];
        let g = vec![0.0; 21];
        let err = fit_inflation_regression(&p, &g, 5, 20).unwrap_err();
        assert!(matches!(err, RegressionError::SingularDesign { .. }));
    }

    #[test]
    fn test_empty_window_rejected() {
        let p = vec![0.0; 10];
        let g = vec![0.0; 10];
        assert_eq!(
            fit_inflation_regression(&p, &g, 8, 9).unwrap_err(),
            RegressionError::WindowEmpty { t_burn: 8, t_max: 9 }
        );
    }

    #[test]
    fn test_sample_too_short() {
        // t_burn + 2..=t_max gives 2 rows for 3 unknowns.
        let p = vec![0.1, 0.2, 0.15, 0.18, 0.22];
        let g = vec![0.0, 0.01, -0.02, 0.03, 0.01];
        let err = fit_inflation_regression(&p, &g, 0, 3).unwrap_err();
        assert_eq!(err, RegressionError::SampleTooShort { len: 2, min: 3 });
    }

    #[test]
    fn test_coefficients_accessor() {
        let fit = RegressionFit {
            intercept: 1.0,
            growth_coef: 2.0,
            lagged_price_coef: 3.0,
        };
        assert_eq!(fit.coefficients(), [1.0, 2.0, 3.0]);
    }
}
