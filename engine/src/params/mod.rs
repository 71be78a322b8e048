//! Economic parameters
//!
//! Scalar constants of the menu-cost economy, validated once at construction
//! and immutable afterwards. Standard deviations are derived from the shock
//! variances here so the rest of the engine never re-derives them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parameter validation
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("Shock variance must be non-negative: {name} = {value}")]
    NegativeVariance { name: &'static str, value: f64 },

    #[error("Demand elasticity gamma must exceed 1, got {0}")]
    GammaOutOfRange(f64),

    #[error("Discount factor beta must lie in (0, 1), got {0}")]
    BetaOutOfRange(f64),

    #[error("Money-growth persistence rho must satisfy |rho| < 1, got {0}")]
    RhoOutOfRange(f64),
}

/// Economic constants of the menu-cost model
///
/// # Fields
///
/// * `psi` - Adjustment-cost curvature
/// * `beta` - Discount factor, in (0, 1)
/// * `var_e` - Variance of the idiosyncratic productivity innovation
/// * `var_u` - Variance of the aggregate money-growth innovation
/// * `rho` - AR(1) persistence of money growth, |rho| < 1
/// * `gamma` - Demand elasticity, > 1
///
/// # Example
///
/// ```
/// use pricing_simulator_core_rs::Parameters;
///
/// let params = Parameters::new(30.0, 0.99, 0.01, 0.005, 0.5, 4.0).unwrap();
/// assert_eq!(params.steady_state_markup(), 4.0 / 3.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    psi: f64,
    beta: f64,
    var_e: f64,
    var_u: f64,
    rho: f64,
    gamma: f64,
    /// Derived: sqrt(var_e)
    sigma_e: f64,
    /// Derived: sqrt(var_u)
    sigma_u: f64,
}

impl Parameters {
    /// Build and validate the parameter set
    ///
    /// # Returns
    ///
    /// * `Ok(Parameters)` with derived standard deviations
    /// * `Err(ParameterError)` if any constant is outside its valid range
    pub fn new(
        psi: f64,
        beta: f64,
        var_e: f64,
        var_u: f64,
        rho: f64,
        gamma: f64,
    ) -> Result<Self, ParameterError> {
        if var_e < 0.0 || !var_e.is_finite() {
            return Err(ParameterError::NegativeVariance {
                name: "var_e",
                value: var_e,
            });
        }
        if var_u < 0.0 || !var_u.is_finite() {
            return Err(ParameterError::NegativeVariance {
                name: "var_u",
                value: var_u,
            });
        }
        if !(gamma > 1.0) || !gamma.is_finite() {
            return Err(ParameterError::GammaOutOfRange(gamma));
        }
        if !(beta > 0.0 && beta < 1.0) {
            return Err(ParameterError::BetaOutOfRange(beta));
        }
        if !(rho.abs() < 1.0) {
            return Err(ParameterError::RhoOutOfRange(rho));
        }

        Ok(Self {
            psi,
            beta,
            var_e,
            var_u,
            rho,
            gamma,
            sigma_e: var_e.sqrt(),
            sigma_u: var_u.sqrt(),
        })
    }

    pub fn psi(&self) -> f64 {
        self.psi
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn var_e(&self) -> f64 {
        self.var_e
    }

    pub fn var_u(&self) -> f64 {
        self.var_u
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn sigma_e(&self) -> f64 {
        self.sigma_e
    }

    pub fn sigma_u(&self) -> f64 {
        self.sigma_u
    }

    /// Frictionless steady-state markup gamma/(gamma - 1)
    ///
    /// Used to initialize the firm cross-section when no warm-start
    /// vector is available.
    pub fn steady_state_markup(&self) -> f64 {
        self.gamma / (self.gamma - 1.0)
    }
}
