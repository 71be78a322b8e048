//! Simulation engine
//!
//! The [`Economy`] owns the model primitives (parameters, regime chain,
//! solved policy oracle) and drives the two simulation entry points:
//! [`Economy::simulate_series`] for the regression run and
//! [`Economy::store_outcome`] for the impulse-response run with history
//! tracking and artifact persistence.

mod economy;
mod warmstart;

use std::path::PathBuf;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::markov::MarkovError;
use crate::params::Parameters;
use crate::policy::{SolverError, StabilityError};

pub use economy::{Economy, ImpulseOutcome, SeriesOutcome};
pub use warmstart::{load_warm_start, save_warm_start};

/// Complete economy configuration
///
/// # Fields
///
/// * `params` - Validated economic constants
/// * `kappa` - Per-regime menu-cost values, handed to the policy solver
/// * `pi_k` - Row-stochastic regime transition matrix
/// * `reg` - Regularization vector for the solver
/// * `warm_start_path` - Optional on-disk markup vector loaded at run start
///   and overwritten at run end
#[derive(Debug, Clone)]
pub struct EconomyConfig {
    pub params: Parameters,
    pub kappa: Vec<f64>,
    pub pi_k: DMatrix<f64>,
    pub reg: Vec<f64>,
    pub warm_start_path: Option<PathBuf>,
}

/// Inputs to one simulation run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Burn-in periods dropped before the regression sample
    pub t_burn: usize,
    /// Simulation horizon; periods run `1..=t_max`
    pub t_max: usize,
    /// Cross-section size
    pub n_firms: usize,
    /// Seed for the run's deterministic draw streams
    pub seed: u64,
}

impl RunConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.n_firms == 0 {
            return Err(SimulationError::InvalidConfig(
                "n_firms must be > 0".to_string(),
            ));
        }
        if self.t_burn + 2 > self.t_max {
            return Err(SimulationError::InvalidConfig(format!(
                "horizon too short: t_burn = {} leaves no regression sample before t_max = {}",
                self.t_burn, self.t_max
            )));
        }
        Ok(())
    }
}

/// Extra inputs for the impulse-response (history-tracking) mode
#[derive(Debug, Clone)]
pub struct ImpulseConfig {
    /// One-time proportional nominal shock applied at `t == t_burn`
    pub shock: f64,
    /// Version tag embedded in every artifact file name
    pub version: u32,
    /// Directory receiving the artifact files
    pub output_dir: PathBuf,
}

impl ImpulseConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.shock <= -1.0 || !self.shock.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "shock must be finite and > -1, got {}",
                self.shock
            )));
        }
        Ok(())
    }
}

/// Simulation error types
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Markov(#[from] MarkovError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Fatal: the aggregate price path left the oracle's valid domain.
    /// The run stops at the offending period instead of corrupting state.
    #[error("Stability bound violated at period {period}: {source}")]
    Stability {
        period: usize,
        source: StabilityError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_rejects_zero_firms() {
        let run = RunConfig {
            t_burn: 5,
            t_max: 20,
            n_firms: 0,
            seed: 1,
        };
        assert!(matches!(
            run.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_config_rejects_short_horizon() {
        let run = RunConfig {
            t_burn: 19,
            t_max: 20,
            n_firms: 10,
            seed: 1,
        };
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_impulse_config_rejects_degenerate_shock() {
        let impulse = ImpulseConfig {
            shock: -1.0,
            version: 1,
            output_dir: "/tmp".into(),
        };
        assert!(impulse.validate().is_err());
    }
}
