//! Tagged union over every component type.

use crate::boundary::{Sink, Source};
use crate::condenser::Condenser;
use crate::cycle_closer::CycleCloser;
use crate::error::{ComponentError, ComponentResult};
use crate::heat_exchanger::SimpleHeatExchanger;
use crate::pump::Pump;
use crate::traits::{ComponentKind, ComponentModel};
use crate::turbine::Turbine;

/// A component owned by a network.
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    SimpleHeatExchanger(SimpleHeatExchanger),
    Turbine(Turbine),
    Pump(Pump),
    Condenser(Condenser),
    Source(Source),
    Sink(Sink),
    CycleCloser(CycleCloser),
}

impl Component {
    pub fn model(&self) -> &dyn ComponentModel {
        match self {
            Component::SimpleHeatExchanger(c) => c,
            Component::Turbine(c) => c,
            Component::Pump(c) => c,
            Component::Condenser(c) => c,
            Component::Source(c) => c,
            Component::Sink(c) => c,
            Component::CycleCloser(c) => c,
        }
    }

    pub fn model_mut(&mut self) -> &mut dyn ComponentModel {
        match self {
            Component::SimpleHeatExchanger(c) => c,
            Component::Turbine(c) => c,
            Component::Pump(c) => c,
            Component::Condenser(c) => c,
            Component::Source(c) => c,
            Component::Sink(c) => c,
            Component::CycleCloser(c) => c,
        }
    }

    pub fn name(&self) -> &str {
        self.model().name()
    }

    pub fn kind(&self) -> ComponentKind {
        self.model().kind()
    }

    /// Fix a named parameter.
    pub fn set_param(&mut self, name: &str, value: f64) -> ComponentResult<()> {
        let result = self.model_mut().params_mut().fix(name, value);
        result.map_err(|e| self.with_owner(e))
    }

    /// Release a named parameter to the solver.
    pub fn free_param(&mut self, name: &str) -> ComponentResult<()> {
        let result = self.model_mut().params_mut().free(name);
        result.map_err(|e| self.with_owner(e))
    }

    fn with_owner(&self, err: ComponentError) -> ComponentError {
        match err {
            ComponentError::UnknownParameter { name, .. } => ComponentError::UnknownParameter {
                component: self.name().to_string(),
                name,
            },
            other => other,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Component {
            fn from(c: $ty) -> Self {
                Component::$ty(c)
            }
        })*
    };
}

impl_from!(SimpleHeatExchanger, Turbine, Pump, Condenser, Source, Sink, CycleCloser);
