//! Aggregate per-period time series
//!
//! One scalar per period over `t_max + 1` periods. Period 0 holds the
//! deterministic initial conditions; every later entry is written exactly
//! once by the period update.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate series produced by a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    /// Money growth `g[t]`
    pub g: Vec<f64>,
    /// Money stock `M[t]`
    pub m: Vec<f64>,
    /// Log aggregate CES price `p[t]`
    pub p: Vec<f64>,
    /// Fraction of firms changing price in period t
    pub fchange: Vec<f64>,
    /// Mean absolute log price change among changers
    pub pchange: Vec<f64>,
    /// Rescaled population std of signed log price changes
    pub pchange_std: Vec<f64>,
}

impl AggregateSeries {
    /// Allocate all series over `t_max + 1` periods, zero-filled
    pub fn new(t_max: usize) -> Self {
        let len = t_max + 1;
        Self {
            g: vec![0.0; len],
            m: vec![0.0; len],
            p: vec![0.0; len],
            fchange: vec![0.0; len],
            pchange: vec![0.0; len],
            pchange_std: vec![0.0; len],
        }
    }

    /// Number of periods including period 0
    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Post-burn-in summary diagnostics over `[t_burn + 1, t_max]`
    pub fn summary(&self, t_burn: usize) -> SeriesSummary {
        let window = (t_burn + 1).min(self.len());
        SeriesSummary {
            mean_adjust_frequency: mean(&self.fchange[window..]),
            mean_change_size: mean(&self.pchange[window..]),
            mean_change_std: mean(&self.pchange_std[window..]),
        }
    }
}

/// Reported run diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Average fraction of firms adjusting per period
    pub mean_adjust_frequency: f64,
    /// Average size of price changes
    pub mean_change_size: f64,
    /// Average std of price changes
    pub mean_change_std: f64,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Average number of changes: {}",
            self.mean_adjust_frequency
        )?;
        writeln!(f, "Average size of price change: {}", self.mean_change_size)?;
        write!(f, "Average std of price changes: {}", self.mean_change_std)
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}
