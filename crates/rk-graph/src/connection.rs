//! Directed streams between component ports.

use crate::error::{GraphError, GraphResult};
use rk_components::{PortKind, StateVar};
use rk_core::{CompId, UnitSystem};
use rk_fluids::{Composition, FluidModel};
use std::sync::Arc;

/// One port of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub comp: CompId,
    pub kind: PortKind,
    pub index: usize,
}

impl PortRef {
    pub fn outlet(comp: CompId, index: usize) -> Self {
        Self {
            comp,
            kind: PortKind::Outlet,
            index,
        }
    }

    pub fn inlet(comp: CompId, index: usize) -> Self {
        Self {
            comp,
            kind: PortKind::Inlet,
            index,
        }
    }
}

/// User-fixed state variables of a connection, in SI units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpecSet {
    pub m: Option<f64>,
    pub p: Option<f64>,
    pub t: Option<f64>,
    pub h: Option<f64>,
}

impl SpecSet {
    pub fn get(&self, var: StateVar) -> Option<f64> {
        match var {
            StateVar::MassFlow => self.m,
            StateVar::Pressure => self.p,
            StateVar::Temperature => self.t,
            StateVar::Enthalpy => self.h,
        }
    }

    pub fn set(&mut self, var: StateVar, value: Option<f64>) {
        match var {
            StateVar::MassFlow => self.m = value,
            StateVar::Pressure => self.p = value,
            StateVar::Temperature => self.t = value,
            StateVar::Enthalpy => self.h = value,
        }
    }

    /// Number of fixed variables.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Fixed variables in (m, p, T, h) order.
    pub fn iter(&self) -> impl Iterator<Item = (StateVar, f64)> + '_ {
        [
            StateVar::MassFlow,
            StateVar::Pressure,
            StateVar::Temperature,
            StateVar::Enthalpy,
        ]
        .into_iter()
        .filter_map(|var| self.get(var).map(|v| (var, v)))
    }
}

/// Attributes passed to [`Connection::set_attr`], in the caller's units.
///
/// ```
/// use rk_graph::ConnAttrs;
///
/// let attrs = ConnAttrs::new().t(600.0).p(150.0).m(532.0);
/// assert_eq!(attrs.p, Some(150.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnAttrs {
    pub m: Option<f64>,
    pub p: Option<f64>,
    pub t: Option<f64>,
    pub h: Option<f64>,
    pub fluid: Option<Composition>,
}

impl ConnAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn m(mut self, v: f64) -> Self {
        self.m = Some(v);
        self
    }

    pub fn p(mut self, v: f64) -> Self {
        self.p = Some(v);
        self
    }

    pub fn t(mut self, v: f64) -> Self {
        self.t = Some(v);
        self
    }

    pub fn h(mut self, v: f64) -> Self {
        self.h = Some(v);
        self
    }

    pub fn fluid(mut self, comp: Composition) -> Self {
        self.fluid = Some(comp);
        self
    }
}

/// Current state of a connection in SI units.
///
/// `t` is only present once the solver has evaluated the state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConnectionState {
    pub m: f64,
    pub p: f64,
    pub h: f64,
    pub t: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub label: String,
    pub source: PortRef,
    pub target: PortRef,
    composition: Composition,
    fluid_model: Option<Arc<dyn FluidModel>>,
    specs: SpecSet,
    state: ConnectionState,
}

impl Connection {
    pub(crate) fn new(label: String, source: PortRef, target: PortRef) -> Self {
        Self {
            label,
            source,
            target,
            composition: Composition::water(),
            fluid_model: None,
            specs: SpecSet::default(),
            state: ConnectionState::default(),
        }
    }

    /// Fix the given attributes; values are interpreted in `units`.
    ///
    /// Attributes left as `None` keep their previous specification.
    pub fn set_attr(&mut self, units: &UnitSystem, attrs: ConnAttrs) -> GraphResult<()> {
        let converted = [
            (StateVar::MassFlow, attrs.m, "m"),
            (StateVar::Pressure, attrs.p.map(|v| units.pressure_to_si(v)), "p"),
            (StateVar::Temperature, attrs.t.map(|v| units.temperature_to_si(v)), "T"),
            (StateVar::Enthalpy, attrs.h.map(|v| units.enthalpy_to_si(v)), "h"),
        ];
        for (_, value, what) in &converted {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(GraphError::InvalidSpec {
                    label: self.label.clone(),
                    what: *what,
                });
            }
        }
        for (var, value, _) in converted {
            if value.is_some() {
                self.specs.set(var, value);
            }
        }
        if let Some(comp) = attrs.fluid {
            self.composition = comp;
        }
        Ok(())
    }

    /// Release a fixed variable.
    pub fn unset_attr(&mut self, var: StateVar) {
        self.specs.set(var, None);
    }

    /// Release every fixed variable.
    pub fn clear_specs(&mut self) {
        self.specs = SpecSet::default();
    }

    pub fn specs(&self) -> &SpecSet {
        &self.specs
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Use a dedicated property model for this stream.
    pub fn set_fluid_model(&mut self, model: Arc<dyn FluidModel>) {
        self.fluid_model = Some(model);
    }

    pub fn fluid_model(&self) -> Option<&Arc<dyn FluidModel>> {
        self.fluid_model.as_ref()
    }

    /// Current (possibly not yet converged) state.
    pub fn get_state(&self) -> ConnectionState {
        self.state
    }

    pub fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        Connection::new(
            "1".into(),
            PortRef::outlet(CompId::from_index(0), 0),
            PortRef::inlet(CompId::from_index(1), 0),
        )
    }

    #[test]
    fn set_attr_converts_to_si() {
        let mut c = conn();
        c.set_attr(&UnitSystem::engineering(), ConnAttrs::new().t(600.0).p(150.0).m(532.0))
            .unwrap();
        let specs = c.specs();
        assert!((specs.p.unwrap() - 1.5e7).abs() < 1e-6);
        assert!((specs.t.unwrap() - 873.15).abs() < 1e-9);
        assert_eq!(specs.m, Some(532.0));
        assert_eq!(specs.count(), 3);
    }

    #[test]
    fn set_attr_merges_and_unset_releases() {
        let mut c = conn();
        let si = UnitSystem::si();
        c.set_attr(&si, ConnAttrs::new().p(1.0e5)).unwrap();
        c.set_attr(&si, ConnAttrs::new().h(4.0e5)).unwrap();
        assert_eq!(c.specs().count(), 2);
        c.unset_attr(StateVar::Pressure);
        assert_eq!(c.specs().p, None);
        assert_eq!(c.specs().h, Some(4.0e5));
    }

    #[test]
    fn non_finite_spec_rejected() {
        let mut c = conn();
        let err = c
            .set_attr(&UnitSystem::si(), ConnAttrs::new().p(f64::NAN).m(1.0))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidSpec { what: "p", .. }));
        assert_eq!(c.specs().count(), 0);
    }

    #[test]
    fn spec_iteration_order() {
        let specs = SpecSet {
            m: Some(1.0),
            p: None,
            t: Some(300.0),
            h: None,
        };
        let vars: Vec<_> = specs.iter().map(|(v, _)| v).collect();
        assert_eq!(vars, vec![StateVar::MassFlow, StateVar::Temperature]);
    }
}
