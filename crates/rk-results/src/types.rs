//! Result data types.
//!
//! All values are SI; conversion happens in the accessor.

use serde::{Deserialize, Serialize};

use crate::ResultsResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub label: String,
    pub m_kg_s: f64,
    pub p_pa: f64,
    pub t_k: f64,
    pub h_j_per_kg: f64,
    pub s_j_per_kg_k: f64,
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub name: String,
    pub value: f64,
    /// False when the value was solved for.
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub name: String,
    pub kind: String,
    pub power_w: Option<f64>,
    pub heat_duty_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<NamedValue>,
}

impl ComponentSnapshot {
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }

    pub fn diagnostic(&self, name: &str) -> Option<f64> {
        self.diagnostics
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value)
    }
}

/// The last converged iterate of a network, detached from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    pub iterations: usize,
    /// Scaled infinity norm of the residual at the returned iterate.
    pub residual_norm: f64,
    pub connections: Vec<ConnectionSnapshot>,
    pub components: Vec<ComponentSnapshot>,
}

impl ResultsSnapshot {
    pub fn connection(&self, label: &str) -> Option<&ConnectionSnapshot> {
        self.connections.iter().find(|c| c.label == label)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSnapshot> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn to_json(&self) -> ResultsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ResultsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> ResultsSnapshot {
    ResultsSnapshot {
        iterations: 3,
        residual_norm: 0.02,
        connections: vec![ConnectionSnapshot {
            label: "1".into(),
            m_kg_s: 532.0,
            p_pa: 1.5e7,
            t_k: 873.15,
            h_j_per_kg: 3.583e6,
            s_j_per_kg_k: 6677.0,
            phase: "vapor".into(),
            quality: None,
        }],
        components: vec![ComponentSnapshot {
            name: "steam turbine".into(),
            kind: "Turbine".into(),
            power_w: Some(7.0e8),
            heat_duty_w: None,
            params: vec![ParamSnapshot {
                name: "eta_s".into(),
                value: 0.9,
                fixed: true,
            }],
            diagnostics: Vec::new(),
        }],
    }
}
