//! Steady-state problem: residual assembly over a validated network.

use nalgebra::{DMatrix, DVector};
use rk_components::{ComponentModel, ParamValue, PortState, PortStates, Residual, StateVar};
use rk_core::units::pa;
use rk_core::{CompId, ConnId};
use rk_fluids::{FluidModel, StateInput};
use rk_graph::{
    ComponentPorts, ConnectionState, GraphError, GraphResult, Network, VariableLayout,
};
use rk_results::{
    ComponentSnapshot, ConnectionSnapshot, NamedValue, ParamSnapshot, ResultsSnapshot,
};

use crate::config::{ResidualTolerances, SolverConfig};
use crate::error::SolverResult;
use crate::jacobian::finite_difference_jacobian;
use crate::newton::StepControl;

/// The square nonlinear system `r(x) = 0` of one network.
///
/// Equation order is fixed: every component's equations in component order
/// (structural equations, then one per parameter), followed by the
/// connection specifications in connection order (m, p, T, h).
pub struct SteadyProblem<'a> {
    net: &'a Network,
    layout: VariableLayout,
    ports: Vec<ComponentPorts>,
    fluids: Vec<&'a dyn FluidModel>,
    tolerances: ResidualTolerances,
    max_pressure_step: f64,
    max_enthalpy_step: f64,
}

impl<'a> SteadyProblem<'a> {
    /// Build the system; fails unless unknowns and equations balance.
    pub fn new(net: &'a Network, config: &SolverConfig) -> SolverResult<Self> {
        let layout = net.layout();
        let ports = net
            .comp_ids()
            .map(|id| net.port_connections(id))
            .collect::<GraphResult<Vec<_>>>()?;
        let fluids = net
            .conn_ids()
            .map(|id| net.fluid_for(id))
            .collect::<GraphResult<Vec<_>>>()?;

        let problem = Self {
            net,
            layout,
            ports,
            fluids,
            tolerances: config.tolerances,
            max_pressure_step: config.max_pressure_step,
            max_enthalpy_step: config.max_enthalpy_step,
        };
        let delta = problem.layout.len() as i64 - problem.equation_count() as i64;
        if delta != 0 {
            return Err(GraphError::DegreesOfFreedom { delta }.into());
        }
        Ok(problem)
    }

    pub fn network(&self) -> &'a Network {
        self.net
    }

    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    pub fn tolerances(&self) -> &ResidualTolerances {
        &self.tolerances
    }

    pub fn fluid(&self, conn: ConnId) -> &'a dyn FluidModel {
        self.fluids[conn.slot()]
    }

    pub fn ports(&self, comp: CompId) -> &ComponentPorts {
        &self.ports[comp.slot()]
    }

    pub fn equation_count(&self) -> usize {
        let components: usize = self
            .net
            .components()
            .iter()
            .map(|c| c.model().equation_count())
            .sum();
        let specs: usize = self
            .net
            .connections()
            .iter()
            .map(|c| c.specs().count())
            .sum();
        components + specs
    }

    /// (m, p, h) of a connection taken from `x`.
    pub fn port_state(&self, x: &[f64], conn: ConnId) -> PortState<'a> {
        PortState {
            m: x[self.layout.mass(conn)],
            p: x[self.layout.pressure(conn)],
            h: x[self.layout.enthalpy(conn)],
            fluid: self.fluid(conn),
        }
    }

    pub fn port_states(&self, x: &[f64], comp: CompId) -> PortStates<'a> {
        let ports = self.ports(comp);
        PortStates {
            inlets: ports.inlets.iter().map(|&c| self.port_state(x, c)).collect(),
            outlets: ports.outlets.iter().map(|&c| self.port_state(x, c)).collect(),
        }
    }

    /// Every parameter of `comp`: fixed values, and free values from `x`.
    pub fn params(
        &self,
        x: &[f64],
        comp: CompId,
        model: &dyn ComponentModel,
    ) -> SolverResult<Vec<f64>> {
        let free = &x[self.layout.comp_free_range(comp)];
        Ok(model.params().resolve(free)?)
    }

    fn models(&self) -> impl Iterator<Item = (CompId, &'a dyn ComponentModel)> {
        self.net
            .comp_ids()
            .zip(self.net.components())
            .map(|(id, c)| (id, c.model()))
    }

    /// Unscaled residuals in equation order.
    pub fn assemble_residuals(&self, x: &[f64]) -> SolverResult<Vec<Residual>> {
        let mut out = Vec::with_capacity(self.layout.len());

        for (id, model) in self.models() {
            let ports = self.port_states(x, id);
            let params = self.params(x, id, model)?;
            model.residuals(&ports, &params, &mut out)?;
        }

        for (id, conn) in self.net.conn_ids().zip(self.net.connections()) {
            for (var, value) in conn.specs().iter() {
                let residual = match var {
                    StateVar::MassFlow => Residual::mass(x[self.layout.mass(id)] - value),
                    StateVar::Pressure => Residual::pressure(x[self.layout.pressure(id)] - value),
                    StateVar::Enthalpy => Residual::enthalpy(x[self.layout.enthalpy(id)] - value),
                    StateVar::Temperature => {
                        let state = self.port_state(x, id);
                        let t = state.fluid.t_ph(pa(state.p), state.h)?;
                        Residual::temperature(t.value - value)
                    }
                };
                out.push(residual);
            }
        }

        Ok(out)
    }

    /// Residuals divided by their tolerances; converged when every entry
    /// has magnitude below one.
    pub fn scaled_residuals(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let residuals = self.assemble_residuals(x.as_slice())?;
        Ok(DVector::from_iterator(
            residuals.len(),
            residuals
                .iter()
                .map(|r| r.value / self.tolerances.for_kind(r.kind)),
        ))
    }

    /// Finite-difference Jacobian of the scaled residuals.
    pub fn jacobian(
        &self,
        x: &DVector<f64>,
        fx: &DVector<f64>,
        fd_step: f64,
    ) -> SolverResult<DMatrix<f64>> {
        finite_difference_jacobian(x, fx, |x| self.scaled_residuals(x), fd_step)
    }

    /// Connection states at `x`, with temperature where it can be evaluated.
    pub fn connection_states(&self, x: &[f64]) -> Vec<ConnectionState> {
        self.net
            .conn_ids()
            .map(|id| {
                let state = self.port_state(x, id);
                ConnectionState {
                    m: state.m,
                    p: state.p,
                    h: state.h,
                    t: state.temperature().ok(),
                }
            })
            .collect()
    }

    /// Detached results at `x`.
    pub fn snapshot(
        &self,
        x: &[f64],
        iterations: usize,
        residual_norm: f64,
    ) -> SolverResult<ResultsSnapshot> {
        let mut connections = Vec::with_capacity(self.net.connections().len());
        for (id, conn) in self.net.conn_ids().zip(self.net.connections()) {
            let port = self.port_state(x, id);
            let state = port.fluid.state(StateInput::PH {
                p: pa(port.p),
                h: port.h,
            })?;
            connections.push(ConnectionSnapshot {
                label: conn.label.clone(),
                m_kg_s: port.m,
                p_pa: port.p,
                t_k: state.temperature().value,
                h_j_per_kg: port.h,
                s_j_per_kg_k: state.s(),
                phase: state.phase().label().to_string(),
                quality: state.quality(),
            });
        }

        let mut components = Vec::with_capacity(self.net.components().len());
        for (id, model) in self.models() {
            let ports = self.port_states(x, id);
            let values = self.params(x, id, model)?;
            let outputs = model.outputs(&ports, &values)?;
            let params = model
                .params()
                .specs()
                .iter()
                .zip(model.params().values())
                .zip(&values)
                .map(|((spec, slot), value)| ParamSnapshot {
                    name: spec.name.to_string(),
                    value: *value,
                    fixed: matches!(slot, ParamValue::Fixed(_)),
                })
                .collect();
            components.push(ComponentSnapshot {
                name: model.name().to_string(),
                kind: model.kind().label().to_string(),
                power_w: outputs.power.map(|p| p.value),
                heat_duty_w: outputs.heat_duty.map(|q| q.value),
                params,
                diagnostics: outputs
                    .extras
                    .into_iter()
                    .map(|(name, value)| NamedValue {
                        name: name.to_string(),
                        value,
                    })
                    .collect(),
            });
        }

        Ok(ResultsSnapshot {
            iterations,
            residual_norm,
            connections,
            components,
        })
    }
}

impl StepControl for SteadyProblem<'_> {
    /// Caps |Δp| to a fraction of the current pressure and |Δh| to an
    /// absolute bound on every connection.
    fn max_step(&self, x: &DVector<f64>, dx: &DVector<f64>) -> f64 {
        let mut alpha: f64 = 1.0;
        for id in self.net.conn_ids() {
            let (ip, ih) = (self.layout.pressure(id), self.layout.enthalpy(id));
            let dp = dx[ip].abs();
            if dp > 0.0 {
                alpha = alpha.min(self.max_pressure_step * x[ip].abs() / dp);
            }
            let dh = dx[ih].abs();
            if dh > 0.0 {
                alpha = alpha.min(self.max_enthalpy_step / dh);
            }
        }
        alpha
    }

    /// Clamp pressure and enthalpy into each stream's property limits.
    fn project(&self, x: &mut DVector<f64>) {
        for id in self.net.conn_ids() {
            let fluid = self.fluid(id);
            let (p_min, p_max) = fluid.pressure_limits();
            let (h_min, h_max) = fluid.enthalpy_limits();
            let ip = self.layout.pressure(id);
            let ih = self.layout.enthalpy(id);
            x[ip] = x[ip].clamp(p_min.value, p_max.value);
            x[ih] = x[ih].clamp(h_min, h_max);
        }
    }
}
