//! Stable indexing of the solver's unknown vector.
//!
//! Layout of `x`:
//! - `[3i, 3i+1, 3i+2]` hold (m, p, h) of connection `i`
//! - free component parameters follow, grouped by component in ID order

use std::ops::Range;

use rk_components::StateVar;
use rk_core::{CompId, ConnId};

use crate::network::Network;

/// Physical meaning of one entry of the unknown vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    MassFlow,
    Pressure,
    Enthalpy,
    /// Free parameter `index` of a component.
    Param { comp: CompId, index: usize },
}

/// Index map between network objects and positions in `x`.
///
/// Two layouts compare equal exactly when a vector built for one is valid
/// for the other, which is what warm starts check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableLayout {
    connections: usize,
    /// (component, parameter index) for each free parameter, in `x` order.
    free_params: Vec<(CompId, usize)>,
    /// Start of each component's free parameters in `x`, plus a final end.
    comp_offsets: Vec<usize>,
}

impl VariableLayout {
    pub fn from_network(net: &Network) -> Self {
        let connections = net.connections().len();
        let mut free_params = Vec::new();
        let mut comp_offsets = Vec::with_capacity(net.components().len() + 1);
        for (component, id) in net.components().iter().zip(net.comp_ids()) {
            comp_offsets.push(3 * connections + free_params.len());
            for index in component.model().params().free_indices() {
                free_params.push((id, index));
            }
        }
        comp_offsets.push(3 * connections + free_params.len());

        Self {
            connections,
            free_params,
            comp_offsets,
        }
    }

    /// Length of the unknown vector.
    pub fn len(&self) -> usize {
        3 * self.connections + self.free_params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn connection_count(&self) -> usize {
        self.connections
    }

    pub fn mass(&self, conn: ConnId) -> usize {
        3 * conn.slot()
    }

    pub fn pressure(&self, conn: ConnId) -> usize {
        3 * conn.slot() + 1
    }

    pub fn enthalpy(&self, conn: ConnId) -> usize {
        3 * conn.slot() + 2
    }

    /// Position of a connection variable; temperature is not an unknown.
    pub fn var(&self, conn: ConnId, var: StateVar) -> Option<usize> {
        match var {
            StateVar::MassFlow => Some(self.mass(conn)),
            StateVar::Pressure => Some(self.pressure(conn)),
            StateVar::Enthalpy => Some(self.enthalpy(conn)),
            StateVar::Temperature => None,
        }
    }

    pub fn kind(&self, i: usize) -> Option<VarKind> {
        if i < 3 * self.connections {
            return Some(match i % 3 {
                0 => VarKind::MassFlow,
                1 => VarKind::Pressure,
                _ => VarKind::Enthalpy,
            });
        }
        self.free_params
            .get(i - 3 * self.connections)
            .map(|&(comp, index)| VarKind::Param { comp, index })
    }

    pub fn free_params(&self) -> &[(CompId, usize)] {
        &self.free_params
    }

    /// Positions of a component's free parameters in `x`.
    pub fn comp_free_range(&self, comp: CompId) -> Range<usize> {
        let start = self.comp_offsets.get(comp.slot()).copied().unwrap_or(0);
        let end = self.comp_offsets.get(comp.slot() + 1).copied().unwrap_or(start);
        start..end
    }
}
