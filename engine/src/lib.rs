//! Pricing Simulator Core - Rust Engine
//!
//! Stochastic simulation of a firm panel under state-dependent (menu-cost)
//! pricing with aggregate monetary shocks and idiosyncratic productivity
//! shocks, plus the reduced-form regression summarizing the simulated
//! inflation dynamics.
//!
//! # Architecture
//!
//! - **params**: Validated economic constants
//! - **markov**: Regime chain (cumulative rows, stationary distribution)
//! - **rng**: Deterministic seeded draw streams and inverse-CDF sampling
//! - **models**: Firm panel and aggregate time series
//! - **policy**: Policy oracle / solver capability interface
//! - **engine**: The Economy and its two simulation entry points
//! - **regression**: OLS fit of the inflation process
//! - **output**: Delimited-text artifacts for impulse-response runs
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic: one master stream per run, one
//!    derived sub-stream per (period, firm)
//! 2. Periods are sequential; firms within a period run in parallel with
//!    task-local accumulators reduced after the join
//! 3. Markups stay strictly positive and regime draws stay in range

// Module declarations
pub mod engine;
pub mod markov;
pub mod models;
pub mod output;
pub mod params;
pub mod policy;
pub mod regression;
pub mod rng;

// Re-exports for convenience
pub use engine::{
    Economy, EconomyConfig, ImpulseConfig, ImpulseOutcome, RunConfig, SeriesOutcome,
    SimulationError,
};
pub use markov::{MarkovError, RegimeChain};
pub use models::{AggregateSeries, FirmPanel, FirmState, SeriesSummary};
pub use params::{ParameterError, Parameters};
pub use policy::{
    BandSolver, MockStickyPolicy, PolicyInput, PolicyOracle, PolicySolver, SsBandPolicy,
    StabilityError,
};
pub use regression::{fit_inflation_regression, RegressionError, RegressionFit};
pub use rng::{draw_discrete, DrawStreams};
