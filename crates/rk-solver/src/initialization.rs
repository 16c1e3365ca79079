//! Starting points for the Newton iteration.
//!
//! A cold start builds `x0` in stages:
//! 1. user specifications (temperature specs become enthalpies once the
//!    pressure of the stream is known)
//! 2. component relations applied to a fixpoint, see
//!    [`ComponentModel::propagate_guess`]
//! 3. component default guesses, one component at a time, each followed by
//!    another propagation pass
//! 4. global fallbacks for whatever is still unknown
//!
//! Free parameters are then seeded from the values the guessed states
//! imply. A property failure during stage 1-2 comes from the user's own
//! numbers and is reported; later stages only skip what cannot be
//! evaluated.

use nalgebra::DVector;
use rk_components::ports::fill;
use rk_components::{ComponentModel, GuessPort, GuessPorts, GuessValues, PortKind, StateVar};
use rk_core::units::{k, pa};
use rk_core::{CompId, ConnId};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::problem::SteadyProblem;

const FALLBACK_MASS_FLOW: f64 = 1.0;
const FALLBACK_PRESSURE: f64 = 1.0e5;
const FALLBACK_ENTHALPY: f64 = 4.0e5;

/// Build a starting point from specifications and component relations.
pub fn cold_start(problem: &SteadyProblem<'_>) -> SolverResult<DVector<f64>> {
    let net = problem.network();
    let mut guesses: Vec<GuessValues> = net
        .connections()
        .iter()
        .map(|c| {
            let specs = c.specs();
            GuessValues::new(
                specs.get(StateVar::MassFlow),
                specs.get(StateVar::Pressure),
                specs.get(StateVar::Enthalpy),
            )
        })
        .collect();

    propagate(problem, &mut guesses, true)?;

    for (id, component) in net.comp_ids().zip(net.components()) {
        if guesses.iter().all(GuessValues::is_complete) {
            break;
        }
        if apply_defaults(problem, id, component.model(), &mut guesses) {
            propagate(problem, &mut guesses, false)?;
        }
    }

    let mut changed = false;
    for guess in &mut guesses {
        changed |= fill(&mut guess.m, Some(FALLBACK_MASS_FLOW));
        changed |= fill(&mut guess.p, Some(FALLBACK_PRESSURE));
    }
    if changed {
        propagate(problem, &mut guesses, false)?;
    }
    for guess in &mut guesses {
        fill(&mut guess.h, Some(FALLBACK_ENTHALPY));
    }

    let layout = problem.layout();
    let mut x = DVector::zeros(layout.len());
    for (id, guess) in net.conn_ids().zip(&guesses) {
        x[layout.mass(id)] = guess.m.unwrap_or(FALLBACK_MASS_FLOW);
        x[layout.pressure(id)] = guess.p.unwrap_or(FALLBACK_PRESSURE);
        x[layout.enthalpy(id)] = guess.h.unwrap_or(FALLBACK_ENTHALPY);
    }
    seed_free_params(problem, &mut x);
    Ok(x)
}

/// Start from a previous iterate of the same layout, with the current
/// specifications written over it.
pub fn warm_start(
    problem: &SteadyProblem<'_>,
    previous: &DVector<f64>,
) -> SolverResult<DVector<f64>> {
    let layout = problem.layout();
    if previous.len() != layout.len() {
        return Err(SolverError::Numeric {
            what: format!(
                "warm start vector has {} entries, expected {}",
                previous.len(),
                layout.len()
            ),
        });
    }

    let mut x = previous.clone();
    let net = problem.network();
    for (id, conn) in net.conn_ids().zip(net.connections()) {
        let specs = conn.specs();
        if let Some(m) = specs.get(StateVar::MassFlow) {
            x[layout.mass(id)] = m;
        }
        if let Some(p) = specs.get(StateVar::Pressure) {
            x[layout.pressure(id)] = p;
        }
        if let Some(h) = specs.get(StateVar::Enthalpy) {
            x[layout.enthalpy(id)] = h;
        } else if let Some(t) = specs.get(StateVar::Temperature) {
            x[layout.enthalpy(id)] = problem.fluid(id).h_pt(pa(x[layout.pressure(id)]), k(t))?;
        }
    }
    Ok(x)
}

/// Apply temperature specs and component relations until nothing changes.
///
/// With `strict`, an out-of-range property lookup is returned as an error.
fn propagate(
    problem: &SteadyProblem<'_>,
    guesses: &mut [GuessValues],
    strict: bool,
) -> SolverResult<()> {
    let net = problem.network();
    let max_rounds = 4 * guesses.len() + 4;

    for _ in 0..max_rounds {
        let mut changed = temperature_specs(problem, guesses, strict)?;

        for (id, component) in net.comp_ids().zip(net.components()) {
            let model = component.model();
            let ports = problem.ports(id);
            let mut view = GuessPorts {
                inlets: guess_ports(problem, guesses, &ports.inlets),
                outlets: guess_ports(problem, guesses, &ports.outlets),
            };

            match model.propagate_guess(&mut view) {
                Ok(true) => {
                    let pairs = ports
                        .inlets
                        .iter()
                        .zip(&view.inlets)
                        .chain(ports.outlets.iter().zip(&view.outlets));
                    for (conn, port) in pairs {
                        changed |= guesses[conn.slot()].merge_missing(port.values);
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    let err = SolverError::from(e);
                    if strict && matches!(err, SolverError::OutOfRange(_)) {
                        return Err(err);
                    }
                    debug!(component = model.name(), error = %err, "guess propagation skipped");
                }
            }
        }

        if !changed {
            break;
        }
    }
    Ok(())
}

fn guess_ports<'a>(
    problem: &SteadyProblem<'a>,
    guesses: &[GuessValues],
    conns: &[ConnId],
) -> Vec<GuessPort<'a>> {
    conns
        .iter()
        .map(|&conn| GuessPort {
            values: guesses[conn.slot()],
            fluid: problem.fluid(conn),
        })
        .collect()
}

/// Turn fixed temperatures into enthalpies where the pressure is known.
fn temperature_specs(
    problem: &SteadyProblem<'_>,
    guesses: &mut [GuessValues],
    strict: bool,
) -> SolverResult<bool> {
    let net = problem.network();
    let mut changed = false;
    for (id, conn) in net.conn_ids().zip(net.connections()) {
        let guess = &mut guesses[id.slot()];
        let (Some(t), Some(p), None) = (conn.specs().get(StateVar::Temperature), guess.p, guess.h)
        else {
            continue;
        };
        match problem.fluid(id).h_pt(pa(p), k(t)) {
            Ok(h) => changed |= fill(&mut guess.h, Some(h)),
            Err(e) if strict && e.is_out_of_range() => return Err(e.into()),
            Err(e) => debug!(connection = %conn.label, error = %e, "temperature guess skipped"),
        }
    }
    Ok(changed)
}

fn apply_defaults(
    problem: &SteadyProblem<'_>,
    id: CompId,
    model: &dyn ComponentModel,
    guesses: &mut [GuessValues],
) -> bool {
    let ports = problem.ports(id);
    let mut changed = false;
    for (index, conn) in ports.inlets.iter().enumerate() {
        changed |= guesses[conn.slot()].merge_missing(model.default_guess(PortKind::Inlet, index));
    }
    for (index, conn) in ports.outlets.iter().enumerate() {
        changed |= guesses[conn.slot()].merge_missing(model.default_guess(PortKind::Outlet, index));
    }
    changed
}

/// Free parameters start at the value the current states imply, or at the
/// parameter's nominal guess when that is unavailable or out of bounds.
fn seed_free_params(problem: &SteadyProblem<'_>, x: &mut DVector<f64>) {
    let net = problem.network();
    let layout = problem.layout();
    for (id, component) in net.comp_ids().zip(net.components()) {
        let range = layout.comp_free_range(id);
        if range.is_empty() {
            continue;
        }
        let model = component.model();
        let implied = model
            .implied_params(&problem.port_states(x.as_slice(), id))
            .ok();
        let specs = model.params().specs();
        for (slot, index) in range.zip(model.params().free_indices()) {
            let spec = &specs[index];
            x[slot] = implied
                .as_ref()
                .and_then(|values| values.get(index).copied())
                .filter(|v| v.is_finite() && spec.contains(*v))
                .unwrap_or(spec.guess);
        }
    }
}
