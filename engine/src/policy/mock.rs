//! Mock policy for testing
//!
//! Never adjusts: the returned markup is always the "no adjustment" value
//! `x.normalized_markup`, so `Fchange` stays at zero and the aggregate price
//! path is driven purely by the shock processes. Used to verify the engine's
//! accounting in isolation from any repricing behavior.

use super::{PolicyInput, PolicyOracle, StabilityError};

/// Policy that never changes a price
///
/// # Example
///
/// ```
/// use pricing_simulator_core_rs::policy::{MockStickyPolicy, PolicyInput, PolicyOracle};
///
/// let policy = MockStickyPolicy::default();
/// let x = PolicyInput {
///     normalized_markup: 1.37,
///     money_growth: 0.02,
///     lagged_log_price: 0.3,
/// };
/// assert_eq!(policy.evaluate(&x, 0), 1.37);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockStickyPolicy;

impl MockStickyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyOracle for MockStickyPolicy {
    fn evaluate(&self, x: &PolicyInput, _regime: usize) -> f64 {
        x.normalized_markup
    }

    fn check_price_bound(&self, log_price: f64) -> Result<(), StabilityError> {
        // No tabulated domain; only reject non-finite prices.
        if !log_price.is_finite() {
            return Err(StabilityError {
                log_price,
                lower: f64::NEG_INFINITY,
                upper: f64::INFINITY,
            });
        }
        Ok(())
    }
}
