//! The component/connection network and its specification manager.

use std::collections::HashMap;
use std::sync::Arc;

use rk_components::{Component, PortKind};
use rk_core::{CompId, ConnId};
use rk_fluids::{FluidModel, Iapws97};

use crate::connection::{Connection, ConnectionState, PortRef};
use crate::error::{GraphError, GraphResult};
use crate::layout::VariableLayout;
use crate::ledger::DofLedger;
use crate::validate;

/// Connections attached to one component, in port order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPorts {
    pub inlets: Vec<ConnId>,
    pub outlets: Vec<ConnId>,
}

/// Owns every component and connection of one plant.
///
/// Components and connections get dense IDs in insertion order; neither
/// can be removed, so IDs stay valid for the life of the network.
#[derive(Debug, Clone)]
pub struct Network {
    components: Vec<Component>,
    connections: Vec<Connection>,
    occupied: HashMap<PortRef, ConnId>,
    default_fluid: Arc<dyn FluidModel>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Empty network whose streams use IAPWS-IF97 water.
    pub fn new() -> Self {
        Self::with_fluid_model(Arc::new(Iapws97::new()))
    }

    pub fn with_fluid_model(model: Arc<dyn FluidModel>) -> Self {
        Self {
            components: Vec::new(),
            connections: Vec::new(),
            occupied: HashMap::new(),
            default_fluid: model,
        }
    }

    pub fn add_component(&mut self, component: impl Into<Component>) -> GraphResult<CompId> {
        let component = component.into();
        if self.component_id(component.name()).is_some() {
            return Err(GraphError::DuplicateName {
                name: component.name().to_string(),
            });
        }
        let id = CompId::from_index(self.components.len() as u32);
        self.components.push(component);
        Ok(id)
    }

    /// Register a stream from an outlet port to an inlet port.
    pub fn add_connection(
        &mut self,
        label: impl Into<String>,
        source: PortRef,
        target: PortRef,
    ) -> GraphResult<ConnId> {
        let label = label.into();
        if self.connection_id(&label).is_some() {
            return Err(GraphError::DuplicateLabel { label });
        }
        if source.kind != PortKind::Outlet || target.kind != PortKind::Inlet {
            return Err(GraphError::InvalidPortDirection { label });
        }
        for port in [source, target] {
            self.check_port(port)?;
            if self.occupied.contains_key(&port) {
                return Err(GraphError::DuplicatePort {
                    component: self.component(port.comp)?.name().to_string(),
                    kind: port.kind,
                    index: port.index,
                });
            }
        }

        let id = ConnId::from_index(self.connections.len() as u32);
        self.occupied.insert(source, id);
        self.occupied.insert(target, id);
        self.connections.push(Connection::new(label, source, target));
        Ok(id)
    }

    fn check_port(&self, port: PortRef) -> GraphResult<()> {
        let model = self.component(port.comp)?.model();
        let count = match port.kind {
            PortKind::Inlet => model.inlet_count(),
            PortKind::Outlet => model.outlet_count(),
        };
        if port.index >= count {
            return Err(GraphError::InvalidPort {
                component: model.name().to_string(),
                kind: port.kind,
                index: port.index,
                count,
            });
        }
        Ok(())
    }

    pub fn component(&self, id: CompId) -> GraphResult<&Component> {
        self.components
            .get(id.slot())
            .ok_or(GraphError::UnknownComponent { id })
    }

    pub fn component_mut(&mut self, id: CompId) -> GraphResult<&mut Component> {
        self.components
            .get_mut(id.slot())
            .ok_or(GraphError::UnknownComponent { id })
    }

    pub fn component_id(&self, name: &str) -> Option<CompId> {
        self.components
            .iter()
            .position(|c| c.name() == name)
            .map(|i| CompId::from_index(i as u32))
    }

    pub fn connection(&self, id: ConnId) -> GraphResult<&Connection> {
        self.connections
            .get(id.slot())
            .ok_or(GraphError::UnknownConnection { id })
    }

    pub fn connection_mut(&mut self, id: ConnId) -> GraphResult<&mut Connection> {
        self.connections
            .get_mut(id.slot())
            .ok_or(GraphError::UnknownConnection { id })
    }

    pub fn connection_id(&self, label: &str) -> Option<ConnId> {
        self.connections
            .iter()
            .position(|c| c.label == label)
            .map(|i| ConnId::from_index(i as u32))
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn comp_ids(&self) -> impl Iterator<Item = CompId> + '_ {
        (0..self.components.len()).map(|i| CompId::from_index(i as u32))
    }

    pub fn conn_ids(&self) -> impl Iterator<Item = ConnId> + '_ {
        (0..self.connections.len()).map(|i| ConnId::from_index(i as u32))
    }

    pub fn connection_at(&self, port: PortRef) -> Option<ConnId> {
        self.occupied.get(&port).copied()
    }

    /// Connections on every port of `comp`; fails on the first open port.
    pub fn port_connections(&self, comp: CompId) -> GraphResult<ComponentPorts> {
        let model = self.component(comp)?.model();
        let collect = |kind: PortKind, count: usize| -> GraphResult<Vec<ConnId>> {
            (0..count)
                .map(|index| {
                    self.connection_at(PortRef { comp, kind, index })
                        .ok_or_else(|| GraphError::UnconnectedPort {
                            component: model.name().to_string(),
                            kind,
                            index,
                        })
                })
                .collect()
        };
        Ok(ComponentPorts {
            inlets: collect(PortKind::Inlet, model.inlet_count())?,
            outlets: collect(PortKind::Outlet, model.outlet_count())?,
        })
    }

    /// Property model of a connection: its own override or the network default.
    pub fn fluid_for(&self, conn: ConnId) -> GraphResult<&dyn FluidModel> {
        let connection = self.connection(conn)?;
        Ok(connection
            .fluid_model()
            .map(|m| m.as_ref())
            .unwrap_or(self.default_fluid.as_ref()))
    }

    pub fn default_fluid(&self) -> &Arc<dyn FluidModel> {
        &self.default_fluid
    }

    /// Fix a component parameter by component name.
    pub fn set_param(&mut self, component: &str, param: &str, value: f64) -> GraphResult<()> {
        let id = self
            .component_id(component)
            .ok_or_else(|| GraphError::UnknownName {
                name: component.to_string(),
            })?;
        self.component_mut(id)?.set_param(param, value)?;
        Ok(())
    }

    pub fn set_state(&mut self, conn: ConnId, state: ConnectionState) -> GraphResult<()> {
        self.connection_mut(conn)?.set_state(state);
        Ok(())
    }

    /// Itemized degrees-of-freedom count; does not fail.
    pub fn dof(&self) -> DofLedger {
        DofLedger::from_network(self)
    }

    /// Unknown-vector layout for the current parameter configuration.
    pub fn layout(&self) -> VariableLayout {
        VariableLayout::from_network(self)
    }

    /// Structural checks, over-specification checks and the DOF balance,
    /// in that order.
    pub fn validate(&self) -> GraphResult<DofLedger> {
        validate::check_structure(self)?;
        validate::check_over_specification(self)?;
        let ledger = self.dof();
        if ledger.delta() != 0 {
            return Err(GraphError::DegreesOfFreedom {
                delta: ledger.delta(),
            });
        }
        Ok(ledger)
    }
}
