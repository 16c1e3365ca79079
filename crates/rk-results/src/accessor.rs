//! Read-only access to converged results.
//!
//! Every accessor fails with [`ResultsError::NotConverged`] unless the last
//! solve converged. Values are never recomputed; they come from the stored
//! snapshot and are converted to the caller's [`UnitSystem`] on the way out.

use rk_core::UnitSystem;
use serde::Serialize;

use crate::status::SolveStatus;
use crate::types::{ComponentSnapshot, ConnectionSnapshot, NamedValue, ResultsSnapshot};
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    status: SolveStatus,
    snapshot: Option<ResultsSnapshot>,
}

impl Default for Results {
    fn default() -> Self {
        Self::unsolved()
    }
}

impl Results {
    pub fn unsolved() -> Self {
        Self {
            status: SolveStatus::Unsolved,
            snapshot: None,
        }
    }

    /// Outcome of a solve that did not converge; exposes no values.
    pub fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            snapshot: None,
        }
    }

    pub fn converged(snapshot: ResultsSnapshot) -> Self {
        Self {
            status: SolveStatus::Converged,
            snapshot: Some(snapshot),
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn snapshot(&self) -> ResultsResult<&ResultsSnapshot> {
        match (&self.snapshot, self.status) {
            (Some(snapshot), SolveStatus::Converged) => Ok(snapshot),
            (_, status) => Err(ResultsError::NotConverged { status }),
        }
    }

    pub fn connection(&self, label: &str) -> ResultsResult<&ConnectionSnapshot> {
        self.snapshot()?
            .connection(label)
            .ok_or_else(|| ResultsError::ConnectionNotFound {
                label: label.to_string(),
            })
    }

    pub fn component(&self, name: &str) -> ResultsResult<&ComponentSnapshot> {
        self.snapshot()?
            .component(name)
            .ok_or_else(|| ResultsError::ComponentNotFound {
                name: name.to_string(),
            })
    }

    /// Connection state in the given units.
    pub fn connection_in(&self, label: &str, units: &UnitSystem) -> ResultsResult<ConnectionView> {
        Ok(ConnectionView::new(self.connection(label)?, units))
    }

    /// Shaft power of a turbine or pump, in `units.power`.
    pub fn power(&self, name: &str, units: &UnitSystem) -> ResultsResult<f64> {
        let component = self.component(name)?;
        component
            .power_w
            .map(|w| units.power_from_si(w))
            .ok_or_else(|| missing(component, "power"))
    }

    /// Heat duty of a heat exchanger or condenser, in `units.power`.
    pub fn heat_duty(&self, name: &str, units: &UnitSystem) -> ResultsResult<f64> {
        let component = self.component(name)?;
        component
            .heat_duty_w
            .map(|w| units.power_from_si(w))
            .ok_or_else(|| missing(component, "heat duty"))
    }

    /// Fixed or solved parameter value (dimensionless or SI).
    pub fn param(&self, name: &str, param: &str) -> ResultsResult<f64> {
        let component = self.component(name)?;
        component
            .param(param)
            .ok_or_else(|| missing(component, param))
    }

    pub fn diagnostic(&self, name: &str, key: &str) -> ResultsResult<f64> {
        let component = self.component(name)?;
        component
            .diagnostic(key)
            .ok_or_else(|| missing(component, key))
    }

    /// All connections and components converted to `units`.
    pub fn table(&self, units: &UnitSystem) -> ResultsResult<ResultsTable> {
        let snapshot = self.snapshot()?;
        Ok(ResultsTable {
            units: *units,
            iterations: snapshot.iterations,
            connections: snapshot
                .connections
                .iter()
                .map(|c| ConnectionView::new(c, units))
                .collect(),
            components: snapshot
                .components
                .iter()
                .map(|c| ComponentView::new(c, units))
                .collect(),
        })
    }
}

fn missing(component: &ComponentSnapshot, what: &str) -> ResultsError {
    ResultsError::ValueNotFound {
        component: component.name.clone(),
        what: what.to_string(),
    }
}

/// Connection state in a caller-chosen unit system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionView {
    pub label: String,
    pub m: f64,
    pub p: f64,
    pub t: f64,
    pub h: f64,
    pub s: f64,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl ConnectionView {
    fn new(c: &ConnectionSnapshot, units: &UnitSystem) -> Self {
        Self {
            label: c.label.clone(),
            m: c.m_kg_s,
            p: units.pressure_from_si(c.p_pa),
            t: units.temperature_from_si(c.t_k),
            h: units.enthalpy_from_si(c.h_j_per_kg),
            s: units.entropy_from_si(c.s_j_per_kg_k),
            phase: c.phase.clone(),
            quality: c.quality,
        }
    }
}

/// Component results with power and heat in a caller-chosen power unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentView {
    pub name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_duty: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<NamedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<NamedValue>,
}

impl ComponentView {
    fn new(c: &ComponentSnapshot, units: &UnitSystem) -> Self {
        Self {
            name: c.name.clone(),
            kind: c.kind.clone(),
            power: c.power_w.map(|w| units.power_from_si(w)),
            heat_duty: c.heat_duty_w.map(|w| units.power_from_si(w)),
            params: c
                .params
                .iter()
                .map(|p| NamedValue {
                    name: p.name.clone(),
                    value: p.value,
                })
                .collect(),
            diagnostics: c.diagnostics.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsTable {
    pub units: UnitSystem,
    pub iterations: usize,
    pub connections: Vec<ConnectionView>,
    pub components: Vec<ComponentView>,
}
