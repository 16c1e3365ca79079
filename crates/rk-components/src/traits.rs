//! Core traits for component models.

use crate::error::ComponentResult;
use crate::params::ParamSet;
use crate::ports::{GuessPorts, GuessValues, PortKind, PortStates, StateVar};
use crate::residual::Residual;
use rk_core::units::Power;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    SimpleHeatExchanger,
    Turbine,
    Pump,
    Condenser,
    Source,
    Sink,
    CycleCloser,
}

impl ComponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::SimpleHeatExchanger => "SimpleHeatExchanger",
            ComponentKind::Turbine => "Turbine",
            ComponentKind::Pump => "Pump",
            ComponentKind::Condenser => "Condenser",
            ComponentKind::Source => "Source",
            ComponentKind::Sink => "Sink",
            ComponentKind::CycleCloser => "CycleCloser",
        }
    }
}

/// Derived results of a component at a solved state.
///
/// `power` and `heat_duty` follow each model's own sign convention: turbine
/// power is extracted work, pump power is consumed work, heater duty is heat
/// added to the fluid and condenser duty is heat rejected by the hot side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentOutputs {
    pub power: Option<Power>,
    pub heat_duty: Option<Power>,
    /// Additional named diagnostics in SI units.
    pub extras: Vec<(&'static str, f64)>,
}

/// A steady-state component: a fixed set of algebraic equations over the
/// (m, p, h) of its ports and its parameters.
///
/// Components are deterministic functions of port states and parameters,
/// suitable for parallel evaluation and network solving.
pub trait ComponentModel: Send + Sync + fmt::Debug {
    /// Component name for debugging and identification.
    fn name(&self) -> &str;

    fn kind(&self) -> ComponentKind;

    fn inlet_count(&self) -> usize;

    fn outlet_count(&self) -> usize;

    fn params(&self) -> &ParamSet;

    fn params_mut(&mut self) -> &mut ParamSet;

    /// Number of equations that do not belong to a parameter.
    fn structural_equation_count(&self) -> usize;

    /// Total equations: structural ones plus one per parameter.
    fn equation_count(&self) -> usize {
        self.structural_equation_count() + self.params().len()
    }

    /// Append exactly `equation_count()` residuals to `out`: structural
    /// equations first, then one per parameter in declaration order.
    ///
    /// `params` holds every parameter value (fixed or current free value).
    fn residuals(
        &self,
        ports: &PortStates<'_>,
        params: &[f64],
        out: &mut Vec<Residual>,
    ) -> ComponentResult<()>;

    /// Parameter values implied by the port states, in declaration order.
    ///
    /// Used to seed free parameters and to report solved parameters.
    fn implied_params(&self, ports: &PortStates<'_>) -> ComponentResult<Vec<f64>>;

    /// Power, heat and diagnostics at the given state.
    fn outputs(&self, ports: &PortStates<'_>, params: &[f64]) -> ComponentResult<ComponentOutputs>;

    /// Port variables that this component's own equations determine.
    ///
    /// Fixing one of these on the attached connection over-specifies the
    /// network.
    fn implied_variables(&self) -> Vec<(PortKind, usize, StateVar)> {
        Vec::new()
    }

    /// Fill unknown guess slots from this component's relations.
    ///
    /// Returns whether anything changed. Must never overwrite a known slot.
    fn propagate_guess(&self, _ports: &mut GuessPorts<'_>) -> ComponentResult<bool> {
        Ok(false)
    }

    /// Fallback guess for a port when propagation leaves gaps.
    fn default_guess(&self, _kind: PortKind, _index: usize) -> GuessValues {
        GuessValues::default()
    }
}
