//! Long-lived plant for repeated solves with warm starts.

use std::time::Instant;

use rk_graph::Network;
use rk_results::Results;
use rk_solver::{Solver, SolverConfig, SolverError};
use tracing::{debug, info};

use crate::config::RankineConfig;
use crate::error::AppResult;
use crate::plant;
use crate::service::{PlantReport, RunTiming};

/// Keeps one network and one solver alive between configuration changes.
///
/// Each [`PlantSession::update`] rewrites the specifications in place and
/// solves from the last converged iterate. A warm solve that fails is
/// repeated once from a cold start before the failure is reported.
#[derive(Debug)]
pub struct PlantSession {
    config: RankineConfig,
    net: Network,
    solver: Solver,
}

impl PlantSession {
    /// Build the plant for `config`; nothing is solved yet.
    pub fn new(config: RankineConfig) -> AppResult<Self> {
        let net = plant::build_network(&config)?;
        Ok(Self {
            config,
            net,
            solver: Solver::new(SolverConfig::warm()),
        })
    }

    pub fn config(&self) -> &RankineConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.net
    }

    pub fn results(&self) -> &Results {
        self.solver.results()
    }

    pub fn solver_config_mut(&mut self) -> &mut SolverConfig {
        self.solver.config_mut()
    }

    /// Solve the current configuration.
    pub fn solve(&mut self) -> PlantReport {
        let started = Instant::now();
        let mut outcome = self.solver.solve(&mut self.net).map(|_| ());

        if let Err(err) = &outcome {
            if self.solver.last_converged().is_some() && is_numerical(err) {
                info!(error = %err, "warm start failed, retrying from a cold start");
                self.solver.reset();
                outcome = self.solver.solve(&mut self.net).map(|_| ());
            }
        }

        let timing = RunTiming {
            solve_time_s: started.elapsed().as_secs_f64(),
            ..RunTiming::default()
        };
        PlantReport::from_solve(outcome, self.solver.results(), timing)
    }

    /// Switch to `config` and solve.
    ///
    /// An invalid configuration is reported without touching the plant. A
    /// change of cooling-water model rebuilds the network and drops the
    /// warm-start state.
    pub fn update(&mut self, config: RankineConfig) -> PlantReport {
        let started = Instant::now();
        if let Err(err) = self.apply(&config) {
            return PlantReport::rejected(&err);
        }
        self.config = config;
        let mut report = self.solve();
        report.timing.build_time_s = started.elapsed().as_secs_f64() - report.timing.solve_time_s;
        report
    }

    fn apply(&mut self, config: &RankineConfig) -> AppResult<()> {
        config.validate()?;
        if config.cooling_model != self.config.cooling_model {
            debug!(model = ?config.cooling_model, "cooling model changed, rebuilding plant");
            self.net = plant::build_network(config)?;
            self.solver.reset();
            return Ok(());
        }
        if let Err(err) = plant::apply_config(&mut self.net, config) {
            // leave a consistent plant behind
            self.net = plant::build_network(&self.config)?;
            self.solver.reset();
            return Err(err);
        }
        Ok(())
    }
}

/// Failures a different starting point may cure.
fn is_numerical(err: &SolverError) -> bool {
    matches!(
        err,
        SolverError::Diverged { .. }
            | SolverError::MaxIterationsExceeded { .. }
            | SolverError::OutOfRange(_)
            | SolverError::Numeric { .. }
    )
}
