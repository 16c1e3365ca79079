//! One-shot plant solves.

use std::time::Instant;

use rk_core::UnitSystem;
use rk_results::{Results, ResultsSnapshot, ResultsTable, SolveStatus};
use rk_solver::{Solver, SolverConfig, SolverError};
use serde::{Deserialize, Serialize};

use crate::config::RankineConfig;
use crate::error::{AppError, AppResult};
use crate::plant::{self, CONDENSER, FEED_PUMP, STEAM_GENERATOR, TURBINE};

/// Plant-level figures of a converged solve, all in W.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantSummary {
    pub turbine_power_w: f64,
    pub pump_power_w: f64,
    pub boiler_heat_w: f64,
    pub condenser_heat_w: f64,
    pub net_power_w: f64,
    pub thermal_efficiency: f64,
    /// `Q_boiler + P_pump - P_turbine - Q_condenser`; zero for a closed balance.
    pub energy_balance_w: f64,
}

impl PlantSummary {
    pub fn from_results(results: &Results) -> AppResult<Self> {
        let si = UnitSystem::si();
        let turbine = results.power(TURBINE, &si)?;
        let pump = results.power(FEED_PUMP, &si)?;
        let boiler = results.heat_duty(STEAM_GENERATOR, &si)?;
        let condenser = results.heat_duty(CONDENSER, &si)?;
        let net = turbine - pump;
        Ok(Self {
            turbine_power_w: turbine,
            pump_power_w: pump,
            boiler_heat_w: boiler,
            condenser_heat_w: condenser,
            net_power_w: net,
            thermal_efficiency: net / boiler,
            energy_balance_w: boiler + pump - turbine - condenser,
        })
    }
}

/// Timing and iteration count of one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunTiming {
    pub build_time_s: f64,
    pub solve_time_s: f64,
    pub iterations: usize,
}

/// Outcome of solving the plant for one configuration.
///
/// Failures are carried as a status and message; `summary` is present only
/// when the solve converged.
#[derive(Debug, Clone, Serialize)]
pub struct PlantReport {
    pub status: SolveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PlantSummary>,
    pub timing: RunTiming,
    #[serde(skip)]
    pub results: Results,
}

impl PlantReport {
    /// Report for a failure that happened before the solver ran.
    pub fn rejected(err: &AppError) -> Self {
        Self {
            status: err.status(),
            error: Some(err.to_string()),
            summary: None,
            timing: RunTiming::default(),
            results: Results::failed(err.status()),
        }
    }

    pub(crate) fn from_solve(
        outcome: Result<(), SolverError>,
        results: &Results,
        mut timing: RunTiming,
    ) -> Self {
        if let Err(err) = outcome {
            return Self {
                status: err.status(),
                error: Some(err.to_string()),
                summary: None,
                timing,
                results: results.clone(),
            };
        }
        if let Ok(snapshot) = results.snapshot() {
            timing.iterations = snapshot.iterations;
        }
        match PlantSummary::from_results(results) {
            Ok(summary) => Self {
                status: results.status(),
                error: None,
                summary: Some(summary),
                timing,
                results: results.clone(),
            },
            Err(err) => Self {
                status: err.status(),
                error: Some(err.to_string()),
                summary: None,
                timing,
                results: results.clone(),
            },
        }
    }

    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Connection and component table in `units`.
    pub fn table(&self, units: &UnitSystem) -> AppResult<ResultsTable> {
        Ok(self.results.table(units)?)
    }

    pub fn snapshot(&self) -> AppResult<&ResultsSnapshot> {
        Ok(self.results.snapshot()?)
    }

    /// Status, summary and, when converged, the result table as JSON.
    pub fn to_json(&self, units: &UnitSystem) -> AppResult<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            #[serde(flatten)]
            report: &'a PlantReport,
            #[serde(skip_serializing_if = "Option::is_none")]
            table: Option<ResultsTable>,
        }
        let document = Document {
            report: self,
            table: self.table(units).ok(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Build the plant for `config` and solve it once from a cold start.
pub fn run(config: &RankineConfig) -> PlantReport {
    let started = Instant::now();
    let mut net = match plant::build_network(config) {
        Ok(net) => net,
        Err(err) => return PlantReport::rejected(&err),
    };
    let mut timing = RunTiming {
        build_time_s: started.elapsed().as_secs_f64(),
        ..RunTiming::default()
    };

    let solve_started = Instant::now();
    let mut solver = Solver::new(SolverConfig::default());
    let outcome = solver.solve(&mut net).map(|_| ());
    timing.solve_time_s = solve_started.elapsed().as_secs_f64();

    PlantReport::from_solve(outcome, solver.results(), timing)
}
