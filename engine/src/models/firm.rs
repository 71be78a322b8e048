//! Firm cross-section state
//!
//! One `FirmState` per simulated firm: the markup the policy oracle rewrites
//! every period and the menu-cost regime index redrawn from the chain every
//! period. The panel owns the cross-section for the lifetime of a run;
//! within a period each firm's state is exclusively owned by that firm's
//! update task.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::markov::RegimeChain;
use crate::params::Parameters;

/// Per-firm state
///
/// Invariant: `markup > 0` (the CES power and the normalization by
/// `exp(g + ea)` both depend on it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirmState {
    /// Price relative to marginal cost
    pub markup: f64,
    /// Index into `[0, n_regimes)` of the chain
    pub regime: usize,
}

/// The simulated firm cross-section
#[derive(Debug, Clone)]
pub struct FirmPanel {
    firms: Vec<FirmState>,
}

impl FirmPanel {
    /// Initialize from an explicit markup vector
    ///
    /// Regimes are seeded by inverse-CDF sampling from the chain's
    /// stationary distribution, one independent draw per firm.
    pub fn from_markups<R: Rng>(markups: Vec<f64>, chain: &RegimeChain, rng: &mut R) -> Self {
        let firms = markups
            .into_iter()
            .map(|markup| FirmState {
                markup,
                regime: chain.draw_initial_regime(rng),
            })
            .collect();
        Self { firms }
    }

    /// Initialize every firm at the steady-state markup gamma/(gamma-1)
    pub fn steady_state<R: Rng>(
        n_firms: usize,
        params: &Parameters,
        chain: &RegimeChain,
        rng: &mut R,
    ) -> Self {
        Self::from_markups(
            vec![params.steady_state_markup(); n_firms],
            chain,
            rng,
        )
    }

    pub fn len(&self) -> usize {
        self.firms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firms.is_empty()
    }

    pub fn firms(&self) -> &[FirmState] {
        &self.firms
    }

    pub fn firms_mut(&mut self) -> &mut [FirmState] {
        &mut self.firms
    }

    /// Markups as an owned vector (warm-start persistence, histories)
    pub fn markups(&self) -> Vec<f64> {
        self.firms.iter().map(|f| f.markup).collect()
    }

    /// Divide every markup by `factor`
    ///
    /// Used by the impulse-response mode to apply the one-time proportional
    /// shock before the period's firm loop runs.
    pub fn scale_markups_down(&mut self, factor: f64) {
        for firm in &mut self.firms {
            firm.markup /= factor;
        }
    }

    /// Log CES aggregate price of the current markups
    ///
    /// `ln(mean(markup^(1-gamma))) / (1-gamma)`. Equals `ln(m)` exactly when
    /// every firm carries the same markup `m`.
    pub fn log_ces_price(&self, gamma: f64) -> f64 {
        let sum: f64 = self
            .firms
            .iter()
            .map(|f| f.markup.powf(1.0 - gamma))
            .sum();
        (sum / self.firms.len() as f64).ln() / (1.0 - gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn chain() -> RegimeChain {
        RegimeChain::new(DMatrix::from_row_slice(2, 2, &[0.8, 0.2, 0.3, 0.7])).unwrap()
    }

    fn params() -> Parameters {
        Parameters::new(30.0, 0.99, 0.01, 0.005, 0.5, 4.0).unwrap()
    }

    #[test]
    fn test_steady_state_init() {
        let chain = chain();
        let params = params();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let panel = FirmPanel::steady_state(10, &params, &chain, &mut rng);

        assert_eq!(panel.len(), 10);
        for firm in panel.firms() {
            assert_eq!(firm.markup, 4.0 / 3.0);
            assert!(firm.regime < 2);
        }
    }

    #[test]
    fn test_log_ces_price_idempotent_on_identical_markups() {
        let chain = chain();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let m = 1.25;
        let panel = FirmPanel::from_markups(vec![m; 100], &chain, &mut rng);
        assert!((panel.log_ces_price(4.0) - m.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_scale_markups_down() {
        let chain = chain();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut panel = FirmPanel::from_markups(vec![1.05, 2.1], &chain, &mut rng);
        panel.scale_markups_down(1.05);
        assert!((panel.firms()[0].markup - 1.0).abs() < 1e-15);
        assert!((panel.firms()[1].markup - 2.0).abs() < 1e-15);
    }
}
