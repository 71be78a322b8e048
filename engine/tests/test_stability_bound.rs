//! Stability-bound enforcement
//!
//! A violation of the oracle's aggregate-price domain is fatal: the run
//! stops at the offending period and reports it, instead of continuing to
//! corrupt state.

use std::sync::Arc;

use nalgebra::DMatrix;
use pricing_simulator_core_rs::policy::{PolicyOracle, PolicySolver, SolverError, SsBandPolicy};
use pricing_simulator_core_rs::{
    Economy, EconomyConfig, Parameters, RunConfig, SimulationError,
};

/// Solver whose oracle only tolerates log prices far above anything this
/// economy can produce.
struct NarrowDomainSolver;

impl PolicySolver for NarrowDomainSolver {
    fn solve(
        &self,
        params: &Parameters,
        _kappa: &[f64],
        _pi: &DMatrix<f64>,
        _reg: &[f64],
    ) -> Result<Arc<dyn PolicyOracle>, SolverError> {
        Ok(Arc::new(SsBandPolicy::new(
            params.steady_state_markup(),
            vec![0.1],
            (10.0, 11.0),
        )))
    }
}

#[test]
fn out_of_domain_price_aborts_at_first_period() {
    let params = Parameters::new(30.0, 0.99, 0.01, 0.005, 0.5, 4.0).unwrap();
    let config = EconomyConfig {
        params,
        kappa: vec![0.01],
        pi_k: DMatrix::from_row_slice(1, 1, &[1.0]),
        reg: vec![],
        warm_start_path: None,
    };
    let economy = Economy::new(config, &NarrowDomainSolver).unwrap();

    let run = RunConfig {
        t_burn: 5,
        t_max: 20,
        n_firms: 10,
        seed: 1,
    };

    // p[1] ≈ ln(4/3) is far below the [10, 11] domain.
    match economy.simulate_series(&run) {
        Err(SimulationError::Stability { period, source }) => {
            assert_eq!(period, 1);
            assert!(source.log_price < 10.0);
            assert_eq!(source.lower, 10.0);
        }
        other => panic!("expected stability abort, got {:?}", other.map(|o| o.series.p[1])),
    }
}

#[test]
fn kappa_chain_size_mismatch_is_rejected_at_construction() {
    let params = Parameters::new(30.0, 0.99, 0.01, 0.005, 0.5, 4.0).unwrap();
    let config = EconomyConfig {
        params,
        kappa: vec![0.01, 0.02, 0.03],
        pi_k: DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.4, 0.6]),
        reg: vec![],
        warm_start_path: None,
    };
    assert!(matches!(
        Economy::new(config, &NarrowDomainSolver),
        Err(SimulationError::InvalidConfig(_))
    ));
}
