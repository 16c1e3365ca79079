//! Error types for component operations.

use crate::ports::PortKind;
use rk_core::error::RkError;
use rk_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown parameter '{name}' on component '{component}'")]
    UnknownParameter { component: String, name: String },

    #[error("Parameter {name} = {value} outside its valid range")]
    ParameterOutOfRange { name: &'static str, value: f64 },

    #[error("Missing {kind:?} port {index}")]
    MissingPort { kind: PortKind, index: usize },

    #[error("Fluid property error: {0}")]
    Fluid(#[from] FluidError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    /// The property failure behind this error, if any.
    pub fn fluid(&self) -> Option<&FluidError> {
        match self {
            ComponentError::Fluid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ComponentError> for RkError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => RkError::InvalidArg { what },
            ComponentError::NotSupported { what } => RkError::InvalidArg { what },
            ComponentError::InvalidArg { what } => RkError::InvalidArg { what },
            other => RkError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
