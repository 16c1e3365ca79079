//! Open boundaries: sources and sinks.
//!
//! Neither contributes equations; the attached connection must be fully
//! specified (or determined by its other end) instead.

use crate::error::ComponentResult;
use crate::params::ParamSet;
use crate::ports::PortStates;
use crate::residual::Residual;
use crate::traits::{ComponentKind, ComponentModel, ComponentOutputs};

/// Boundary that feeds one stream into the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    pub name: String,
    params: ParamSet,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamSet::new(&[]),
        }
    }
}

/// Boundary that absorbs one stream leaving the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Sink {
    pub name: String,
    params: ParamSet,
}

impl Sink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamSet::new(&[]),
        }
    }
}

macro_rules! boundary_model {
    ($ty:ty, $kind:expr, $inlets:expr, $outlets:expr) => {
        impl ComponentModel for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn kind(&self) -> ComponentKind {
                $kind
            }

            fn inlet_count(&self) -> usize {
                $inlets
            }

            fn outlet_count(&self) -> usize {
                $outlets
            }

            fn params(&self) -> &ParamSet {
                &self.params
            }

            fn params_mut(&mut self) -> &mut ParamSet {
                &mut self.params
            }

            fn structural_equation_count(&self) -> usize {
                0
            }

            fn residuals(
                &self,
                _ports: &PortStates<'_>,
                _params: &[f64],
                _out: &mut Vec<Residual>,
            ) -> ComponentResult<()> {
                Ok(())
            }

            fn implied_params(&self, _ports: &PortStates<'_>) -> ComponentResult<Vec<f64>> {
                Ok(Vec::new())
            }

            fn outputs(
                &self,
                _ports: &PortStates<'_>,
                _params: &[f64],
            ) -> ComponentResult<ComponentOutputs> {
                Ok(ComponentOutputs::default())
            }
        }
    };
}

boundary_model!(Source, ComponentKind::Source, 0, 1);
boundary_model!(Sink, ComponentKind::Sink, 1, 0);
