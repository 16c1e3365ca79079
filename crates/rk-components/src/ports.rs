//! Port-level views used by component equations and initial guesses.

use crate::error::{ComponentError, ComponentResult};
use rk_core::units::pa;
use rk_fluids::{FluidModel, ThermoState};

/// Direction/kind of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Inlet port (upstream connection).
    Inlet,
    /// Outlet port (downstream connection).
    Outlet,
}

/// Connection state variables that can be specified by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVar {
    MassFlow,
    Pressure,
    Temperature,
    Enthalpy,
}

impl StateVar {
    pub fn symbol(&self) -> &'static str {
        match self {
            StateVar::MassFlow => "m",
            StateVar::Pressure => "p",
            StateVar::Temperature => "T",
            StateVar::Enthalpy => "h",
        }
    }
}

/// Current (m, p, h) at one port in SI units, with the property model of
/// the attached connection.
#[derive(Clone, Copy, Debug)]
pub struct PortState<'a> {
    pub m: f64,
    pub p: f64,
    pub h: f64,
    pub fluid: &'a dyn FluidModel,
}

impl PortState<'_> {
    pub fn state(&self) -> ComponentResult<ThermoState> {
        Ok(self.fluid.state(rk_fluids::StateInput::PH {
            p: pa(self.p),
            h: self.h,
        })?)
    }

    /// Temperature [K].
    pub fn temperature(&self) -> ComponentResult<f64> {
        Ok(self.fluid.t_ph(pa(self.p), self.h)?.value)
    }

    /// Specific entropy [J/(kg·K)].
    pub fn entropy(&self) -> ComponentResult<f64> {
        Ok(self.fluid.s_ph(pa(self.p), self.h)?)
    }
}

/// Port states of one component, in port order.
#[derive(Debug)]
pub struct PortStates<'a> {
    pub inlets: Vec<PortState<'a>>,
    pub outlets: Vec<PortState<'a>>,
}

impl<'a> PortStates<'a> {
    pub fn inlet(&self, index: usize) -> ComponentResult<&PortState<'a>> {
        self.inlets.get(index).ok_or(ComponentError::MissingPort {
            kind: PortKind::Inlet,
            index,
        })
    }

    pub fn outlet(&self, index: usize) -> ComponentResult<&PortState<'a>> {
        self.outlets.get(index).ok_or(ComponentError::MissingPort {
            kind: PortKind::Outlet,
            index,
        })
    }
}

/// Partially known (m, p, h) used while building an initial guess.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GuessValues {
    pub m: Option<f64>,
    pub p: Option<f64>,
    pub h: Option<f64>,
}

impl GuessValues {
    pub fn new(m: Option<f64>, p: Option<f64>, h: Option<f64>) -> Self {
        Self { m, p, h }
    }

    pub fn is_complete(&self) -> bool {
        self.m.is_some() && self.p.is_some() && self.h.is_some()
    }

    /// Fill unset slots from `other`; returns whether anything changed.
    pub fn merge_missing(&mut self, other: GuessValues) -> bool {
        let mut changed = fill(&mut self.m, other.m);
        changed |= fill(&mut self.p, other.p);
        changed |= fill(&mut self.h, other.h);
        changed
    }
}

/// Set `slot` to `value` if it is still unknown and `value` is finite.
pub fn fill(slot: &mut Option<f64>, value: Option<f64>) -> bool {
    match (slot.is_none(), value) {
        (true, Some(v)) if v.is_finite() => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}

#[derive(Debug)]
pub struct GuessPort<'a> {
    pub values: GuessValues,
    pub fluid: &'a dyn FluidModel,
}

/// Guess values at the ports of one component.
///
/// Propagation only ever fills unknown slots, so user specifications and
/// earlier deductions are never overwritten.
#[derive(Debug)]
pub struct GuessPorts<'a> {
    pub inlets: Vec<GuessPort<'a>>,
    pub outlets: Vec<GuessPort<'a>>,
}

impl GuessPorts<'_> {
    /// Equal mass flow through an inlet/outlet pair.
    pub fn share_mass(&mut self, inlet: usize, outlet: usize) -> bool {
        let (a, b) = (self.inlets[inlet].values.m, self.outlets[outlet].values.m);
        fill(&mut self.inlets[inlet].values.m, b) | fill(&mut self.outlets[outlet].values.m, a)
    }

    /// `p_out = ratio * p_in`, applied in whichever direction is open.
    pub fn share_pressure(&mut self, inlet: usize, outlet: usize, ratio: Option<f64>) -> bool {
        let Some(ratio) = ratio.filter(|r| *r > 0.0) else {
            return false;
        };
        let (a, b) = (self.inlets[inlet].values.p, self.outlets[outlet].values.p);
        fill(&mut self.outlets[outlet].values.p, a.map(|p| p * ratio))
            | fill(&mut self.inlets[inlet].values.p, b.map(|p| p / ratio))
    }

    /// Equal enthalpy through an inlet/outlet pair.
    pub fn share_enthalpy(&mut self, inlet: usize, outlet: usize) -> bool {
        let (a, b) = (self.inlets[inlet].values.h, self.outlets[outlet].values.h);
        fill(&mut self.inlets[inlet].values.h, b) | fill(&mut self.outlets[outlet].values.h, a)
    }
}
