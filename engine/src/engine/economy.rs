//! Economy: construction and the two simulation entry points
//!
//! # Period update
//!
//! Periods are strictly sequential; firms within a period are updated in a
//! rayon fan-out with a barrier at the join. Each firm task draws from its
//! own sub-stream (pure function of seed, period, and firm index) and
//! returns its update by value; the per-period accumulators (adjuster
//! count, CES sum, signed log changes) are reduced sequentially in firm
//! order after the join. No shared mutable state crosses tasks, and the
//! aggregate series is bit-identical for a fixed seed regardless of thread
//! count.
//!
//! # The two entry points
//!
//! `simulate_series` accumulates the money stock additively
//! (`M[t] = M[t-1] + exp(g[t])`) and starts `p[0]` at the log CES price of
//! the initial cross-section; `store_outcome` accumulates multiplicatively
//! (`M[t] = M[t-1]·exp(g[t])`) and starts `p[0] = 0`. The source model
//! defines the variants this way and the regression's design matrix differs
//! between them, so both conventions are preserved rather than unified.

use std::sync::Arc;

use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::markov::RegimeChain;
use crate::models::{AggregateSeries, FirmPanel, SeriesSummary};
use crate::output::OutcomeWriter;
use crate::params::Parameters;
use crate::policy::{PolicyInput, PolicyOracle, PolicySolver};
use crate::regression::{fit_inflation_regression, RegressionError, RegressionFit};
use crate::rng::DrawStreams;

use super::warmstart::{load_warm_start, save_warm_start};
use super::{EconomyConfig, ImpulseConfig, RunConfig, SimulationError};

/// Number of leading periods kept in the persisted firm histories
const HISTORY_PERIODS: usize = 1000;

/// Result of a regression run
///
/// The regression outcome is carried as a `Result`: a degenerate sample
/// (singular design, e.g. a constant price path under zero shocks) is
/// surfaced without discarding the simulated series itself.
#[derive(Debug, Clone)]
pub struct SeriesOutcome {
    /// Fitted `[a, b, c]` of `p[t] = a + b·g[t] + c·p[t-1]`
    pub fit: Result<RegressionFit, RegressionError>,
    /// Post-burn-in diagnostics
    pub summary: SeriesSummary,
    /// Full aggregate series
    pub series: AggregateSeries,
}

/// Result of an impulse-response run
#[derive(Debug, Clone)]
pub struct ImpulseOutcome {
    pub fit: Result<RegressionFit, RegressionError>,
    pub summary: SeriesSummary,
    pub series: AggregateSeries,
}

/// One firm's update for one period, returned by value from its task
struct FirmUpdate {
    markup: f64,
    ces_term: f64,
    /// Signed log price change, `None` when the oracle kept the price
    log_change: Option<f64>,
    next_regime: usize,
    /// Idiosyncratic log-productivity innovation (tracked in impulse mode)
    ea: f64,
}

/// Sequentially reduced aggregates of one period's firm loop
struct PeriodAggregates {
    fchange: f64,
    pchange: f64,
    pchange_std: f64,
    log_price: f64,
    ea: Vec<f64>,
}

/// The simulated menu-cost economy
///
/// Construction is the one-time expensive step: it validates the model
/// primitives, builds the regime chain (cumulative rows plus stationary
/// distribution), and runs the external policy solve. The resulting oracle
/// is immutable and shared read-only across all firm tasks.
pub struct Economy {
    params: Parameters,
    kappa: Vec<f64>,
    reg: Vec<f64>,
    chain: RegimeChain,
    oracle: Arc<dyn PolicyOracle>,
    warm_start_path: Option<std::path::PathBuf>,
}

impl Economy {
    /// Build the economy and solve the firm problem once
    ///
    /// # Arguments
    ///
    /// * `config` - Model primitives and warm-start location
    /// * `solver` - External policy solver invoked exactly once
    pub fn new(
        config: EconomyConfig,
        solver: &dyn PolicySolver,
    ) -> Result<Self, SimulationError> {
        if config.kappa.len() != config.pi_k.nrows() {
            return Err(SimulationError::InvalidConfig(format!(
                "kappa has {} regimes but the transition matrix has {}",
                config.kappa.len(),
                config.pi_k.nrows()
            )));
        }

        let chain = RegimeChain::new(config.pi_k)?;
        let oracle = solver.solve(&config.params, &config.kappa, chain.pi(), &config.reg)?;

        Ok(Self {
            params: config.params,
            kappa: config.kappa,
            reg: config.reg,
            chain,
            oracle,
            warm_start_path: config.warm_start_path,
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn chain(&self) -> &RegimeChain {
        &self.chain
    }

    /// Per-regime menu-cost values carried for the policy solver
    pub fn kappa(&self) -> &[f64] {
        &self.kappa
    }

    pub fn reg(&self) -> &[f64] {
        &self.reg
    }

    /// Simulate `t_max` periods for `n_firms` firms and fit the inflation
    /// regression over the post-burn-in sample
    ///
    /// Returns the fitted coefficients, the summary diagnostics, and the
    /// full aggregate series. The final markup vector is persisted as the
    /// warm start for future runs when a path is configured.
    pub fn simulate_series(&self, run: &RunConfig) -> Result<SeriesOutcome, SimulationError> {
        run.validate()?;

        let gamma = self.params.gamma();
        let mut streams = DrawStreams::new(run.seed);
        let mut panel = self.init_panel(run.n_firms, &mut streams);

        let mut series = AggregateSeries::new(run.t_max);
        series.m[0] = 1.0;
        series.g[0] = 0.0;
        series.p[0] = panel.log_ces_price(gamma);

        for t in 1..=run.t_max {
            series.g[t] =
                self.params.rho() * series.g[t - 1] + streams.standard_normal() * self.params.sigma_u();
            // Additive accumulation: this entry point's convention.
            series.m[t] = series.m[t - 1] + series.g[t].exp();

            let agg = self.advance_firms(t, series.g[t], series.p[t - 1], &mut panel, &streams);
            series.fchange[t] = agg.fchange;
            series.pchange[t] = agg.pchange;
            series.pchange_std[t] = agg.pchange_std;
            series.p[t] = agg.log_price;

            self.oracle
                .check_price_bound(series.p[t])
                .map_err(|source| SimulationError::Stability { period: t, source })?;
        }

        let fit = fit_inflation_regression(&series.p, &series.g, run.t_burn, run.t_max);
        let summary = series.summary(run.t_burn);

        if let Some(path) = &self.warm_start_path {
            save_warm_start(path, &panel.markups())?;
        }

        Ok(SeriesOutcome {
            fit,
            summary,
            series,
        })
    }

    /// Impulse-response run: apply a one-time nominal shock at `t_burn`,
    /// track firm histories, and persist the artifact files
    ///
    /// At `t == t_burn` every firm's markup is divided by `(1 + shock)` and
    /// the money stock is multiplied by `(1 + shock)` before the period's
    /// firm loop executes.
    pub fn store_outcome(
        &self,
        run: &RunConfig,
        impulse: &ImpulseConfig,
    ) -> Result<ImpulseOutcome, SimulationError> {
        run.validate()?;
        impulse.validate()?;

        let mut streams = DrawStreams::new(run.seed);
        let mut panel = self.init_panel(run.n_firms, &mut streams);

        let mut series = AggregateSeries::new(run.t_max);
        series.m[0] = 1.0;
        series.g[0] = 0.0;
        series.p[0] = 0.0;

        let hist_len = run.t_max.min(HISTORY_PERIODS);
        let mut mu_hist: Vec<Vec<f64>> = Vec::with_capacity(hist_len);
        let mut a_hist: Vec<Vec<f64>> = Vec::with_capacity(hist_len);
        let mut productivity = vec![1.0; run.n_firms];

        for t in 1..=run.t_max {
            series.g[t] =
                self.params.rho() * series.g[t - 1] + streams.standard_normal() * self.params.sigma_u();
            // Multiplicative accumulation: this entry point's convention.
            series.m[t] = series.m[t - 1] * series.g[t].exp();

            if t == run.t_burn {
                panel.scale_markups_down(1.0 + impulse.shock);
                series.m[t] *= 1.0 + impulse.shock;
            }

            let agg = self.advance_firms(t, series.g[t], series.p[t - 1], &mut panel, &streams);
            for (a, ea) in productivity.iter_mut().zip(&agg.ea) {
                *a *= ea.exp();
            }
            if t <= hist_len {
                mu_hist.push(panel.markups());
                a_hist.push(productivity.clone());
            }

            series.fchange[t] = agg.fchange;
            series.pchange[t] = agg.pchange;
            series.pchange_std[t] = agg.pchange_std;
            series.p[t] = agg.log_price;

            self.oracle
                .check_price_bound(series.p[t])
                .map_err(|source| SimulationError::Stability { period: t, source })?;
        }

        let fit = fit_inflation_regression(&series.p, &series.g, run.t_burn, run.t_max);
        let summary = series.summary(run.t_burn);

        let writer = OutcomeWriter::new(&impulse.output_dir, impulse.version);
        writer.save_matrix("muhist", &mu_hist)?;
        writer.save_matrix("ahist", &a_hist)?;
        writer.save_vector("p", &series.p)?;
        writer.save_vector("g", &series.g)?;
        writer.save_vector("M", &series.m)?;
        writer.save_vector("fchange", &series.fchange)?;

        Ok(ImpulseOutcome {
            fit,
            summary,
            series,
        })
    }

    /// Initialize the firm cross-section
    ///
    /// Markups come from the warm-start file when present and
    /// length-compatible, otherwise every firm starts at the steady-state
    /// markup. Regimes are drawn from the stationary distribution either
    /// way.
    fn init_panel(&self, n_firms: usize, streams: &mut DrawStreams) -> FirmPanel {
        let warm = self
            .warm_start_path
            .as_deref()
            .and_then(|path| load_warm_start(path, n_firms));
        match warm {
            Some(markups) => {
                FirmPanel::from_markups(markups, &self.chain, streams.master_mut())
            }
            None => FirmPanel::steady_state(
                n_firms,
                &self.params,
                &self.chain,
                streams.master_mut(),
            ),
        }
    }

    /// One period's parallel firm update plus sequential reduction
    fn advance_firms(
        &self,
        t: usize,
        g_t: f64,
        p_prev: f64,
        panel: &mut FirmPanel,
        streams: &DrawStreams,
    ) -> PeriodAggregates {
        let gamma = self.params.gamma();
        let sigma_e = self.params.sigma_e();
        let n = panel.len();

        let updates: Vec<FirmUpdate> = panel
            .firms()
            .par_iter()
            .enumerate()
            .map(|(j, firm)| {
                let mut rng = streams.firm_stream(t, j);
                let ea: f64 = rng.sample::<f64, _>(StandardNormal) * sigma_e;

                let no_adjust = firm.markup / (g_t + ea).exp();
                let x = PolicyInput {
                    normalized_markup: no_adjust,
                    money_growth: g_t,
                    lagged_log_price: p_prev,
                };
                let markup = self.oracle.evaluate(&x, firm.regime);
                let log_change = if markup != no_adjust {
                    Some((markup / no_adjust).ln())
                } else {
                    None
                };
                let next_regime = self.chain.draw_next_regime(firm.regime, &mut rng);

                FirmUpdate {
                    markup,
                    ces_term: markup.powf(1.0 - gamma),
                    log_change,
                    next_regime,
                    ea,
                }
            })
            .collect();

        // Deterministic sequential reduction in firm order. The CES sum is
        // reset here every period.
        let mut ces_sum = 0.0;
        let mut changers = 0usize;
        let mut abs_sum = 0.0;
        let mut signed = vec![0.0; n];
        let mut ea = vec![0.0; n];
        for (j, update) in updates.iter().enumerate() {
            ces_sum += update.ces_term;
            ea[j] = update.ea;
            if let Some(change) = update.log_change {
                changers += 1;
                abs_sum += change.abs();
                signed[j] = change;
            }
        }

        for (firm, update) in panel.firms_mut().iter_mut().zip(&updates) {
            firm.markup = update.markup;
            firm.regime = update.next_regime;
        }

        let n_f = n as f64;
        let log_price = (ces_sum / n_f).ln() / (1.0 - gamma);
        let fchange = changers as f64 / n_f;

        // Guard the no-adjusters period: mean/std of changes conditional on
        // zero changers is undefined, reported as zero.
        let (pchange, pchange_std) = if changers > 0 {
            let mean_signed = signed.iter().sum::<f64>() / n_f;
            let var = signed
                .iter()
                .map(|&c| (c - mean_signed).powi(2))
                .sum::<f64>()
                / n_f;
            let rescale = n_f.sqrt() / (changers as f64).sqrt();
            (abs_sum / changers as f64, var.sqrt() * rescale)
        } else {
            (0.0, 0.0)
        };

        PeriodAggregates {
            fchange,
            pchange,
            pchange_std,
            log_price,
            ea,
        }
    }
}
