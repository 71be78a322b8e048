//! Discrete cost-regime Markov chain
//!
//! Validates the transition matrix once, derives the cumulative rows used
//! for inverse-CDF transition sampling and the stationary distribution used
//! to seed the initial firm cross-section. Read-only after construction.

mod chain;

pub use chain::{MarkovError, RegimeChain};
