//! High-level solver interface.

use nalgebra::DVector;
use rk_components::ComponentKind;
use rk_graph::{Network, VariableLayout};
use rk_results::{Results, ResultsSnapshot, SolveStatus};
use tracing::{debug, info, warn};

use crate::config::{InitializationStrategy, SolverConfig};
use crate::error::{SolverError, SolverResult};
use crate::initialization::{cold_start, warm_start};
use crate::newton::{NewtonConfig, NewtonOutcome, newton_solve};
use crate::problem::SteadyProblem;

/// Cycle-closer imbalances above these limits are logged after convergence.
const MASS_IMBALANCE_WARN: f64 = 1e-4;
const ENERGY_IMBALANCE_WARN: f64 = 1.0;

/// A reusable solver: owns its configuration, the outcome of the last
/// solve and the last converged iterate used for warm starts.
///
/// Status follows `Unsolved → Iterating → {Converged, Diverged,
/// MaxIterationsExceeded}`; setup failures end in one of the `*Error`
/// statuses before any iteration.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    results: Results,
    last_converged: Option<(VariableLayout, DVector<f64>)>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            results: Results::unsolved(),
            last_converged: None,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SolverConfig {
        &mut self.config
    }

    pub fn status(&self) -> SolveStatus {
        self.results.status()
    }

    /// Outcome of the last solve; values are readable only when converged.
    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Last converged unknown vector, if any.
    pub fn last_converged(&self) -> Option<&DVector<f64>> {
        self.last_converged.as_ref().map(|(_, x)| x)
    }

    /// Drop the warm-start state.
    pub fn reset(&mut self) {
        self.results = Results::unsolved();
        self.last_converged = None;
    }

    /// Validate and solve `net`, writing the final iterate back to its
    /// connections.
    ///
    /// On failure the error is returned and also recorded as the status of
    /// [`Solver::results`].
    pub fn solve(&mut self, net: &mut Network) -> SolverResult<&Results> {
        match self.run(net) {
            Ok(snapshot) => {
                self.results = Results::converged(snapshot);
                Ok(&self.results)
            }
            Err(e) => {
                self.results = Results::failed(e.status());
                Err(e)
            }
        }
    }

    fn run(&mut self, net: &mut Network) -> SolverResult<ResultsSnapshot> {
        let ledger = net.validate()?;
        debug!(
            unknowns = ledger.unknowns(),
            equations = ledger.equations(),
            "network validated"
        );

        let problem = SteadyProblem::new(net, &self.config)?;
        let x0 = self.initial_point(&problem)?;

        self.results = Results::failed(SolveStatus::Iterating);
        let fd_step = self.config.fd_step;
        let residual_fn = |x: &DVector<f64>| problem.scaled_residuals(x);
        let jacobian_fn = |x: &DVector<f64>, fx: &DVector<f64>| problem.jacobian(x, fx, fd_step);
        let result = newton_solve(
            x0,
            residual_fn,
            jacobian_fn,
            &problem,
            &NewtonConfig::from(&self.config),
        )?;

        let states = problem.connection_states(result.x.as_slice());
        let snapshot = match result.outcome {
            NewtonOutcome::Converged => Some(problem.snapshot(
                result.x.as_slice(),
                result.iterations,
                result.residual_norm,
            )),
            _ => None,
        };
        let layout = problem.layout().clone();

        let ids: Vec<_> = net.conn_ids().collect();
        for (id, state) in ids.into_iter().zip(states) {
            net.set_state(id, state)?;
        }

        match (result.outcome, snapshot) {
            (NewtonOutcome::Converged, Some(snapshot)) => {
                let snapshot = snapshot?;
                info!(
                    iterations = result.iterations,
                    residual = result.residual_norm,
                    "solve converged"
                );
                warn_on_imbalance(&snapshot);
                self.last_converged = Some((layout, result.x));
                Ok(snapshot)
            }
            (NewtonOutcome::Diverged { reason }, _) => {
                warn!(
                    iterations = result.iterations,
                    residual = result.residual_norm,
                    %reason,
                    "solve diverged"
                );
                Err(SolverError::Diverged {
                    iterations: result.iterations,
                    residual_norm: result.residual_norm,
                    reason,
                })
            }
            _ => {
                warn!(
                    iterations = result.iterations,
                    residual = result.residual_norm,
                    "iteration limit reached"
                );
                Err(SolverError::MaxIterationsExceeded {
                    iterations: result.iterations,
                    residual_norm: result.residual_norm,
                })
            }
        }
    }

    fn initial_point(&self, problem: &SteadyProblem<'_>) -> SolverResult<DVector<f64>> {
        if self.config.initialization == InitializationStrategy::Warm {
            match &self.last_converged {
                Some((layout, x)) if layout == problem.layout() => match warm_start(problem, x) {
                    Ok(x) => {
                        debug!("warm start from last converged iterate");
                        return Ok(x);
                    }
                    Err(e) => debug!(error = %e, "warm start rejected, starting cold"),
                },
                Some(_) => debug!("variable layout changed, starting cold"),
                None => debug!("no converged iterate yet, starting cold"),
            }
        }
        cold_start(problem)
    }
}

fn warn_on_imbalance(snapshot: &ResultsSnapshot) {
    let closers = snapshot
        .components
        .iter()
        .filter(|c| c.kind == ComponentKind::CycleCloser.label());
    for closer in closers {
        let mass = closer.diagnostic("mass_imbalance").unwrap_or(0.0);
        let energy = closer.diagnostic("energy_imbalance").unwrap_or(0.0);
        if mass.abs() > MASS_IMBALANCE_WARN || energy.abs() > ENERGY_IMBALANCE_WARN {
            warn!(
                component = %closer.name,
                mass_imbalance = mass,
                energy_imbalance = energy,
                "cycle closer reports an imbalance"
            );
        }
    }
}

/// Solve `net` once with the default configuration and a cold start.
pub fn solve(net: &mut Network) -> SolverResult<Results> {
    let mut solver = Solver::default();
    solver.solve(net)?;
    Ok(solver.results().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_components::{Pump, SimpleHeatExchanger, Sink, Source};
    use rk_core::UnitSystem;
    use rk_graph::{ConnAttrs, PortRef};

    fn feed_line() -> Network {
        let mut net = Network::new();
        let src = net.add_component(Source::new("source")).unwrap();
        let pump = net
            .add_component(Pump::new("pump").with_eta_s(0.8).unwrap())
            .unwrap();
        let heater = net
            .add_component(SimpleHeatExchanger::new("heater").with_pr(0.9).unwrap())
            .unwrap();
        let sink = net.add_component(Sink::new("sink")).unwrap();
        let a = net
            .add_connection("a", PortRef::outlet(src, 0), PortRef::inlet(pump, 0))
            .unwrap();
        let b = net
            .add_connection("b", PortRef::outlet(pump, 0), PortRef::inlet(heater, 0))
            .unwrap();
        let c = net
            .add_connection("c", PortRef::outlet(heater, 0), PortRef::inlet(sink, 0))
            .unwrap();
        let units = UnitSystem::engineering();
        net.connection_mut(a)
            .unwrap()
            .set_attr(&units, ConnAttrs::new().m(20.0).p(1.0).t(30.0))
            .unwrap();
        net.connection_mut(b)
            .unwrap()
            .set_attr(&units, ConnAttrs::new().p(100.0))
            .unwrap();
        net.connection_mut(c)
            .unwrap()
            .set_attr(&units, ConnAttrs::new().t(500.0))
            .unwrap();
        net
    }

    #[test]
    fn open_line_converges_and_writes_back() {
        let mut net = feed_line();
        let mut solver = Solver::default();
        assert_eq!(solver.status(), SolveStatus::Unsolved);
        solver.solve(&mut net).unwrap();
        assert_eq!(solver.status(), SolveStatus::Converged);

        let c = net.connection_id("c").unwrap();
        let state = net.connection(c).unwrap().get_state();
        assert!((state.p - 90.0e5).abs() < 1e-3);
        assert!((state.t.unwrap() - 773.15).abs() < 1e-5);

        let results = solver.results();
        let heater = results.component("heater").unwrap();
        let q = heater.heat_duty_w.unwrap();
        let b = results.connection("b").unwrap();
        let c = results.connection("c").unwrap();
        assert!((q - 20.0 * (c.h_j_per_kg - b.h_j_per_kg)).abs() < 1.0);
    }

    #[test]
    fn dof_error_is_reported_before_iterating() {
        let mut net = feed_line();
        let c = net.connection_id("c").unwrap();
        net.connection_mut(c)
            .unwrap()
            .unset_attr(rk_components::StateVar::Temperature);
        let mut solver = Solver::default();
        let err = solver.solve(&mut net).unwrap_err();
        assert_eq!(err.status(), SolveStatus::DegreesOfFreedomError { delta: 1 });
        assert_eq!(solver.status(), SolveStatus::DegreesOfFreedomError { delta: 1 });
        assert!(solver.results().snapshot().is_err());
    }

    #[test]
    fn warm_start_reuses_last_iterate() {
        let mut net = feed_line();
        let mut solver = Solver::new(SolverConfig::warm());
        solver.solve(&mut net).unwrap();
        assert!(solver.last_converged().is_some());

        let c = net.connection_id("c").unwrap();
        net.connection_mut(c)
            .unwrap()
            .set_attr(&UnitSystem::engineering(), ConnAttrs::new().t(520.0))
            .unwrap();
        let results = solver.solve(&mut net).unwrap();
        let t = results.connection("c").unwrap().t_k;
        assert!((t - 793.15).abs() < 1e-5);

        solver.reset();
        assert!(solver.last_converged().is_none());
        assert_eq!(solver.status(), SolveStatus::Unsolved);
    }

    #[test]
    fn free_function_solves_once() {
        let mut net = feed_line();
        let results = solve(&mut net).unwrap();
        assert!(results.status().is_converged());
        let pump = results.component("pump").unwrap();
        assert!(pump.power_w.unwrap() > 0.0);
    }
}
