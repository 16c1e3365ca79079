//! Graph-specific error types.

use rk_components::{ComponentError, PortKind};
use rk_core::{CompId, ConnId, RkError};

/// Network construction and validation errors.
#[derive(Debug, Clone)]
pub enum GraphError {
    /// A component ID that does not belong to this network.
    UnknownComponent { id: CompId },

    /// A connection ID that does not belong to this network.
    UnknownConnection { id: ConnId },

    /// No component or connection with this name or label.
    UnknownName { name: String },

    /// Two components share a name.
    DuplicateName { name: String },

    /// Two connections share a label.
    DuplicateLabel { label: String },

    /// Port index beyond the component's port count.
    InvalidPort {
        component: String,
        kind: PortKind,
        index: usize,
        count: usize,
    },

    /// A connection must run from an outlet to an inlet.
    InvalidPortDirection { label: String },

    /// The port already carries a connection.
    DuplicatePort {
        component: String,
        kind: PortKind,
        index: usize,
    },

    /// A port without a connection at validation time.
    UnconnectedPort {
        component: String,
        kind: PortKind,
        index: usize,
    },

    /// A closed loop without a cycle closer.
    UnbrokenCycle { component: String },

    /// A cycle closer that does not sit on a closed loop, or shares its loop
    /// with another closer.
    RedundantCycleCloser { component: String },

    /// A variable fixed twice, by the user and by a component or the
    /// saturation line.
    OverSpecified { what: String },

    /// Unknowns minus equations; positive when under-specified.
    DegreesOfFreedom { delta: i64 },

    /// The connection's composition is not supported by its property model.
    UnsupportedFluid { label: String },

    /// A specification value that is not a finite number.
    InvalidSpec { label: String, what: &'static str },

    /// Component-level failure (for example an unknown parameter name).
    Component(ComponentError),
}

impl GraphError {
    /// Errors that come from the shape of the network rather than its
    /// specifications.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            GraphError::OverSpecified { .. } | GraphError::DegreesOfFreedom { .. }
        )
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownComponent { id } => {
                write!(f, "Component {} is not part of this network", id)
            }
            GraphError::UnknownConnection { id } => {
                write!(f, "Connection {} is not part of this network", id)
            }
            GraphError::UnknownName { name } => write!(f, "Nothing named '{}' in this network", name),
            GraphError::DuplicateName { name } => {
                write!(f, "A component named '{}' already exists", name)
            }
            GraphError::DuplicateLabel { label } => {
                write!(f, "A connection labelled '{}' already exists", label)
            }
            GraphError::InvalidPort {
                component,
                kind,
                index,
                count,
            } => {
                write!(
                    f,
                    "Component '{}' has {} {:?} ports; index {} is out of range",
                    component, count, kind, index
                )
            }
            GraphError::InvalidPortDirection { label } => {
                write!(f, "Connection '{}' must run from an outlet to an inlet", label)
            }
            GraphError::DuplicatePort {
                component,
                kind,
                index,
            } => {
                write!(
                    f,
                    "{:?} port {} of '{}' is already connected",
                    kind, index, component
                )
            }
            GraphError::UnconnectedPort {
                component,
                kind,
                index,
            } => {
                write!(f, "{:?} port {} of '{}' is not connected", kind, index, component)
            }
            GraphError::UnbrokenCycle { component } => {
                write!(
                    f,
                    "Closed loop through '{}' has no cycle closer",
                    component
                )
            }
            GraphError::RedundantCycleCloser { component } => {
                write!(
                    f,
                    "Cycle closer '{}' does not close exactly one loop",
                    component
                )
            }
            GraphError::OverSpecified { what } => write!(f, "Over-specified: {}", what),
            GraphError::DegreesOfFreedom { delta } => {
                if *delta > 0 {
                    write!(f, "Degrees of freedom error: {} specification(s) missing", delta)
                } else {
                    write!(f, "Degrees of freedom error: {} specification(s) too many", -delta)
                }
            }
            GraphError::UnsupportedFluid { label } => {
                write!(f, "Fluid of connection '{}' is not supported by its property model", label)
            }
            GraphError::InvalidSpec { label, what } => {
                write!(f, "Connection '{}': {} must be finite", label, what)
            }
            GraphError::Component(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Component(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ComponentError> for GraphError {
    fn from(err: ComponentError) -> Self {
        GraphError::Component(err)
    }
}

impl From<GraphError> for RkError {
    fn from(err: GraphError) -> Self {
        RkError::Invariant {
            what: err.to_string(),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
